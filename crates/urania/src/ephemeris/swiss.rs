use crate::ephemeris::provider::EphemerisProvider;
use crate::ephemeris::time::{julian_day, utc_from_unix};
use crate::ephemeris::types::{EphemerisError, EphemerisSample};
use crate::zodiac::normalize_degrees;
use chrono::{DateTime, Utc};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use swisseph::swe::{calc_ut, set_ephe_path};

// Swiss Ephemeris planet IDs
const PLANET_IDS: &[(&str, i32)] = &[
    ("sun", 0),
    ("moon", 1),
    ("mercury", 2),
    ("venus", 3),
    ("mars", 4),
    ("jupiter", 5),
    ("saturn", 6),
    ("uranus", 7),
    ("neptune", 8),
    ("pluto", 9),
];

const FLG_SWIEPH: i32 = 2;
const FLG_EQUATORIAL: i32 = 2048;

/// 1800-01-01T00:00:00Z, start of the standard sepl_18/semo_18 files
const RANGE_START_UNIX: i64 = -5_364_662_400;
/// 2400-01-01T00:00:00Z
const RANGE_END_UNIX: i64 = 13_569_465_600;

/// Default data directory when neither an explicit path nor `SWISS_EPHEMERIS_PATH` is set
pub const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

// The C library keeps global state (data path, file handles); every call goes through this lock,
// which also records the data path the library currently points at.
static SWISS_LOCK: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Re-point the library only when the data path differs from the current one.
fn ensure_path(current: &mut Option<PathBuf>, path: &Path) {
    if current.as_deref() != Some(path) {
        set_ephe_path(&path.to_string_lossy());
        *current = Some(path.to_path_buf());
    }
}

/// Swiss Ephemeris backed provider
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        let adapter = Self { ephemeris_path: path };
        adapter.apply_path()?;
        log::debug!("Swiss Ephemeris data at {}", adapter.ephemeris_path.display());
        Ok(adapter)
    }

    /// Point the library at this adapter's data directory.
    fn apply_path(&self) -> Result<(), EphemerisError> {
        let mut current = SWISS_LOCK.lock().map_err(|_| EphemerisError::FileNotFound {
            path: self.ephemeris_path.display().to_string(),
            message: "Swiss Ephemeris lock poisoned".to_string(),
        })?;
        ensure_path(&mut current, &self.ephemeris_path);
        Ok(())
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    fn calc(&self, key: &str, code: i32, jd: f64, flags: i32, instant: DateTime<Utc>) -> Result<[f64; 6], EphemerisError> {
        let mut current = SWISS_LOCK.lock().map_err(|_| EphemerisError::CalculationFailed {
            key: key.to_string(),
            instant,
            message: "Swiss Ephemeris lock poisoned".to_string(),
        })?;
        // Another adapter may have moved the global data path.
        ensure_path(&mut current, &self.ephemeris_path);
        let result = calc_ut(jd, code as u32, flags as u32).map_err(|e| EphemerisError::CalculationFailed {
            key: key.to_string(),
            instant,
            message: format!("Swiss Ephemeris error: {}", e),
        })?;
        Ok(result.out)
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn name(&self) -> &str {
        "swiss"
    }

    fn supported_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (utc_from_unix(RANGE_START_UNIX), utc_from_unix(RANGE_END_UNIX))
    }

    fn query(&self, key: &str, instant: DateTime<Utc>) -> Result<EphemerisSample, EphemerisError> {
        if !self.supports(instant) {
            return Err(self.out_of_range(instant));
        }

        let code = PLANET_IDS
            .iter()
            .find(|(id, _)| *id == key)
            .map(|(_, code)| *code)
            .ok_or_else(|| EphemerisError::UnknownBody { key: key.to_string() })?;

        let jd = julian_day(instant);
        let ecliptic = self.calc(key, code, jd, FLG_SWIEPH, instant)?;
        let equatorial = self.calc(key, code, jd, FLG_SWIEPH | FLG_EQUATORIAL, instant)?;

        Ok(EphemerisSample {
            ecliptic_longitude_deg: normalize_degrees(ecliptic[0]),
            ecliptic_latitude_deg: ecliptic[1],
            right_ascension_rad: equatorial[0].to_radians(),
            declination_rad: equatorial[1].to_radians(),
            distance_au: ecliptic[2],
        })
    }
}
