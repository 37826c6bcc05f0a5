//! Time scale helpers shared by the providers.

use chrono::{DateTime, Utc};

/// Julian day of the J2000.0 epoch
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian day of 1970-01-01T00:00:00Z
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Convert a UTC instant to a Julian day, keeping sub-second precision.
///
/// UT is used directly as the dynamical time argument; the ~70 s difference
/// is below the resolution of the analytical theories used here.
pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) * 1e-9;
    UNIX_EPOCH_JD + seconds / SECONDS_PER_DAY
}

/// Julian centuries elapsed since J2000.0
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}

/// Build a UTC instant from a unix timestamp, saturating at chrono's limits.
pub(crate) fn utc_from_unix(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or(if seconds < 0 {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_j2000_epoch() {
        let j2000 = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        assert!((julian_day(j2000) - J2000_JD).abs() < 1e-9);
        assert_eq!(centuries_since_j2000(J2000_JD), 0.0);
    }

    #[test]
    fn test_sub_second_precision() {
        let base = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let later = base + chrono::Duration::milliseconds(500);
        let diff_seconds = (julian_day(later) - julian_day(base)) * SECONDS_PER_DAY;
        assert!((diff_seconds - 0.5).abs() < 1e-3);
    }
}
