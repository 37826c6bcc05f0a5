mod sinks;
mod source;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use sinks::{deliver, JsonFileSink, SignReportSink, Sink, StdoutSink};
use source::{ChartSource, Clock, Source};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use urania::aspects::AspectDetector;
use urania::{parse_instant, EphemerisProvider, KeplerianEphemeris};
use urania_config::{ProviderKind, UraniaSettings};

#[derive(Parser, Debug)]
#[command(name = "skywatch", about = "Planet positions, signs and aspects for an instant")]
struct Cli {
    /// Path to urania.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// UTC instant, RFC 3339 or YYYY-MM-DDThh:mm:ss (default: now)
    #[arg(long, conflicts_with = "watch")]
    at: Option<String>,

    /// Write JSON files into this directory instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write one report per zodiac sign into the --out directory
    #[arg(long, requires = "out")]
    per_sign: bool,

    /// Recompute at the wall clock until Ctrl-C
    #[arg(long)]
    watch: bool,

    /// Seconds between charts in watch mode
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Pretty-print JSON
    #[arg(long)]
    pretty: bool,

    /// Print the JSON schema of urania.toml and exit
    #[arg(long)]
    print_config_schema: bool,
}

impl Cli {
    /// Command-line flags win over the config file
    fn apply(&self, settings: &mut UraniaSettings) {
        if let Some(dir) = &self.out {
            settings.output_dir = Some(dir.clone());
        }
        if self.per_sign {
            settings.per_sign = true;
        }
        if self.pretty {
            settings.pretty = true;
        }
        if let Some(secs) = self.interval {
            settings.watch_interval = Duration::from_secs(secs);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if cli.print_config_schema {
        println!("{}", urania_config::settings_schema()?);
        return Ok(());
    }

    let mut settings = urania_config::load_settings(cli.config.as_deref())?;
    cli.apply(&mut settings);

    let provider = build_provider(&settings)?;
    let (start, end) = provider.supported_range();
    log::info!("Ephemeris: {} ({} to {})", provider.name(), start, end);

    let sinks = build_sinks(&settings);

    if cli.watch {
        let source = ChartSource::new(provider, Clock::Now, settings.watch_interval)
            .with_detector(AspectDetector::with_definitions(settings.aspect_definitions.clone()))
            .with_ruler_scheme(settings.ruler_scheme);
        log::info!("Watching every {:?}", settings.watch_interval);
        return watch(source, &sinks).await;
    }

    let instant = match &cli.at {
        Some(text) => parse_instant(text)?,
        None => Utc::now(),
    };
    let source = ChartSource::new(provider, Clock::Fixed(instant), Duration::ZERO)
        .with_detector(AspectDetector::with_definitions(settings.aspect_definitions.clone()))
        .with_ruler_scheme(settings.ruler_scheme);
    let chart = source
        .compute(instant)
        .await
        .with_context(|| format!("No chart for {}", instant))?;
    log::info!(
        "{} bodies, {} aspects at {}",
        chart.positions.len(),
        chart.aspects.len(),
        instant
    );
    deliver(&chart, &sinks).await
}

fn build_provider(settings: &UraniaSettings) -> anyhow::Result<Arc<dyn EphemerisProvider>> {
    match settings.provider {
        ProviderKind::Keplerian => Ok(Arc::new(KeplerianEphemeris::new())),
        #[cfg(feature = "swiss-ephemeris")]
        ProviderKind::Swiss => {
            let adapter = urania::ephemeris::SwissEphemerisAdapter::new(settings.ephemeris_path.clone())?;
            Ok(Arc::new(adapter))
        }
        #[cfg(not(feature = "swiss-ephemeris"))]
        ProviderKind::Swiss => {
            anyhow::bail!("provider \"swiss\" needs skywatch built with the swiss-ephemeris feature")
        }
    }
}

fn build_sinks(settings: &UraniaSettings) -> Vec<Box<dyn Sink>> {
    let mut sinks: Vec<Box<dyn Sink>> = Vec::new();
    match &settings.output_dir {
        Some(dir) => sinks.push(Box::new(JsonFileSink::new(dir, settings.pretty))),
        None => sinks.push(Box::new(StdoutSink::new(settings.pretty))),
    }
    if settings.per_sign {
        let dir = per_sign_dir(settings);
        log::info!("Writing per-sign reports to {:?}", dir);
        sinks.push(Box::new(SignReportSink::new(dir, settings.pretty)));
    }
    sinks
}

/// Per-sign reports share the output directory; a config without one writes them here.
fn per_sign_dir(settings: &UraniaSettings) -> PathBuf {
    settings
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Feed charts from `source` to `sinks` until the source ends or Ctrl-C.
async fn watch<S: Source>(mut source: S, sinks: &[Box<dyn Sink>]) -> anyhow::Result<()> {
    let name = source.name().to_string();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                log::info!("Interrupted, stopping watch");
                break;
            }
            next = source.poll() => match next {
                None => break,
                Some(Ok(chart)) => {
                    if let Err(e) = deliver(&chart, sinks).await {
                        log::warn!("{}: {:#}", name, e);
                    }
                }
                // Keep watching; the next tick may succeed
                Some(Err(e)) => log::error!("{}: {:#}", name, e),
            },
        }
    }
    Ok(())
}
