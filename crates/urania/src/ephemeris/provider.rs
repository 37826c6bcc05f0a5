use crate::ephemeris::types::{EphemerisError, EphemerisSample};
use chrono::{DateTime, Duration, Utc};

/// Source of geocentric body positions.
///
/// Providers are read-only oracles: every query is independent, so one
/// provider may be shared across threads and queried concurrently.
pub trait EphemerisProvider: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Half-open `[start, end)` window of instants this provider can answer.
    fn supported_range(&self) -> (DateTime<Utc>, DateTime<Utc>);

    /// Position of the body identified by `key` at `instant`.
    fn query(&self, key: &str, instant: DateTime<Utc>) -> Result<EphemerisSample, EphemerisError>;

    /// Positions at `instant` and at `instant + step`, used to derive the
    /// direction of apparent motion.
    fn query_motion(
        &self,
        key: &str,
        instant: DateTime<Utc>,
        step: Duration,
    ) -> Result<(EphemerisSample, EphemerisSample), EphemerisError> {
        let later = instant
            .checked_add_signed(step)
            .ok_or_else(|| self.out_of_range(instant))?;
        let first = self.query(key, instant)?;
        let second = self.query(key, later)?;
        Ok((first, second))
    }

    fn supports(&self, instant: DateTime<Utc>) -> bool {
        let (start, end) = self.supported_range();
        start <= instant && instant < end
    }

    fn out_of_range(&self, instant: DateTime<Utc>) -> EphemerisError {
        let (start, end) = self.supported_range();
        EphemerisError::OutOfRange { instant, start, end }
    }
}
