use crate::bodies::TrackedBody;
use crate::ephemeris::EphemerisError;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that abort a chart calculation. No partial chart is ever returned.
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Ephemeris provider could not answer for {body} at {instant}: {source}")]
    ProviderUnavailable {
        body: TrackedBody,
        instant: DateTime<Utc>,
        #[source]
        source: EphemerisError,
    },
    #[error("Invalid instant {input}: {reason}")]
    InvalidInstant { input: String, reason: String },
}
