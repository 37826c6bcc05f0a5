use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geocentric position of one body at one instant, as reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSample {
    /// Ecliptic longitude of date in degrees (0-360)
    pub ecliptic_longitude_deg: f64,
    /// Ecliptic latitude in degrees
    pub ecliptic_latitude_deg: f64,
    /// Right ascension in radians
    pub right_ascension_rad: f64,
    /// Declination in radians
    pub declination_rad: f64,
    /// Distance from Earth in astronomical units
    pub distance_au: f64,
}

/// Errors that can occur during ephemeris lookups
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Unknown body key: {key}")]
    UnknownBody { key: String },
    #[error("{instant} is outside the supported range {start} .. {end}")]
    OutOfRange {
        instant: DateTime<Utc>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Failed to calculate position for {key} at {instant}: {message}")]
    CalculationFailed {
        key: String,
        instant: DateTime<Utc>,
        message: String,
    },
}
