use anyhow::Context;
use schemars::JsonSchema;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use urania::aspects::{AspectDefinition, AspectKind, ASPECT_TABLE};
use urania::RulerScheme;

/// Paths tried, in order, when no config path is given.
pub const CONFIG_PATHS: [&str; 2] = ["configs/urania.toml", "../../configs/urania.toml"];

/// Widest orb accepted from configuration, in degrees
pub const MAX_ORB_DEG: f64 = 30.0;

const DEFAULT_WATCH_SECS: u64 = 3600;

/// Which ephemeris backend to compute with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Keplerian,
    Swiss,
}

/// Validated settings
#[derive(Debug, Clone)]
pub struct UraniaSettings {
    pub provider: ProviderKind,
    pub ephemeris_path: Option<PathBuf>,
    pub aspect_definitions: Vec<AspectDefinition>,
    pub ruler_scheme: RulerScheme,
    pub output_dir: Option<PathBuf>,
    pub per_sign: bool,
    pub pretty: bool,
    pub watch_interval: Duration,
}

impl Default for UraniaSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            ephemeris_path: None,
            aspect_definitions: ASPECT_TABLE.to_vec(),
            ruler_scheme: RulerScheme::default(),
            output_dir: None,
            per_sign: false,
            pretty: false,
            watch_interval: Duration::from_secs(DEFAULT_WATCH_SECS),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct UraniaToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    aspects: AspectsToml,
    #[serde(default)]
    rulers: RulersToml,
    #[serde(default)]
    output: OutputToml,
    #[serde(default)]
    watch: WatchToml,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct EphemerisToml {
    #[serde(default)]
    provider: ProviderKind,
    /// Swiss Ephemeris data directory
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct AspectsToml {
    /// Orb overrides in degrees, keyed by aspect name
    #[serde(default)]
    orbs: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct RulersToml {
    /// "hybrid", "traditional" or "modern"
    #[serde(default)]
    scheme: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct OutputToml {
    #[serde(default)]
    dir: Option<PathBuf>,
    #[serde(default)]
    per_sign: bool,
    #[serde(default)]
    pretty: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
struct WatchToml {
    #[serde(default = "default_interval_secs")]
    interval_secs: u64,
}

impl Default for WatchToml {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_interval_secs() -> u64 {
    DEFAULT_WATCH_SECS
}

/// Read the config file text.
///
/// An explicit path must exist. Without one, the first readable entry of
/// [`CONFIG_PATHS`] is used, and `None` means no file was found.
pub fn read_config_text(explicit: Option<&Path>) -> anyhow::Result<Option<(PathBuf, String)>> {
    if let Some(path) = explicit {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        return Ok(Some((path.to_path_buf(), text)));
    }
    for p in &CONFIG_PATHS {
        if let Ok(text) = fs::read_to_string(p) {
            return Ok(Some((PathBuf::from(p), text)));
        }
    }
    Ok(None)
}

/// Parse and validate config text
pub fn parse_settings(text: &str) -> anyhow::Result<UraniaSettings> {
    let root: UraniaToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse urania.toml: {e}"))?;
    let UraniaToml {
        ephemeris,
        aspects,
        rulers,
        output,
        watch,
    } = root;

    let ruler_scheme = match rulers.scheme.as_deref() {
        None => RulerScheme::default(),
        Some("hybrid") => RulerScheme::Hybrid,
        Some("traditional") => RulerScheme::Traditional,
        Some("modern") => RulerScheme::Modern,
        Some(other) => anyhow::bail!(
            "rulers.scheme must be one of hybrid, traditional, modern (got {other:?})"
        ),
    };

    if watch.interval_secs == 0 {
        anyhow::bail!("watch.interval_secs must be at least 1");
    }

    if ephemeris.path.is_some() && ephemeris.provider != ProviderKind::Swiss {
        log::warn!("ephemeris.path is only used by the swiss provider; ignoring it");
    }

    Ok(UraniaSettings {
        provider: ephemeris.provider,
        ephemeris_path: ephemeris.path,
        aspect_definitions: apply_orb_overrides(&aspects.orbs)?,
        ruler_scheme,
        output_dir: output.dir,
        per_sign: output.per_sign,
        pretty: output.pretty,
        watch_interval: Duration::from_secs(watch.interval_secs),
    })
}

/// Standard aspect table with configured orbs swapped in. Priority order is kept.
pub fn apply_orb_overrides(orbs: &BTreeMap<String, f64>) -> anyhow::Result<Vec<AspectDefinition>> {
    let mut definitions = ASPECT_TABLE.to_vec();
    for (name, orb) in orbs {
        let kind: AspectKind = name
            .parse()
            .map_err(|e| anyhow::anyhow!("aspects.orbs: {e}"))?;
        if !orb.is_finite() || *orb < 0.0 || *orb > MAX_ORB_DEG {
            anyhow::bail!("aspects.orbs.{name} must be between 0 and {MAX_ORB_DEG} degrees (got {orb})");
        }
        for def in definitions.iter_mut().filter(|d| d.kind == kind) {
            def.orb_deg = *orb;
        }
    }
    Ok(definitions)
}

/// Load settings from `explicit` or the default locations, falling back to defaults.
pub fn load_settings(explicit: Option<&Path>) -> anyhow::Result<UraniaSettings> {
    match read_config_text(explicit)? {
        Some((path, text)) => {
            log::info!("Loading settings from {}", path.display());
            parse_settings(&text).with_context(|| format!("Invalid config {}", path.display()))
        }
        None => {
            log::info!("No urania.toml found in {:?}; using defaults", CONFIG_PATHS);
            Ok(UraniaSettings::default())
        }
    }
}

/// JSON schema of the config file
pub fn settings_schema() -> anyhow::Result<String> {
    let schema = schemars::schema_for!(UraniaToml);
    serde_json::to_string_pretty(&schema).context("Failed to serialize config schema")
}
