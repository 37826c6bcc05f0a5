//! Per-body positions, signs and direction of motion.

use crate::bodies::TrackedBody;
use crate::ephemeris::{EphemerisProvider, EphemerisSample};
use crate::error::ChartError;
use crate::zodiac::{normalize_degrees, sign_for, ZodiacSign};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Multiplier applied to AU distances when building display coordinates.
///
/// Display coordinates are a visualization scale, not a physical unit:
/// divide by this constant to get back to astronomical units.
pub const DISPLAY_SCALE: f64 = 100.0;

/// Gap between the two samples used to decide direction of motion.
pub const MOTION_STEP_SECONDS: i64 = 60;

pub fn motion_step() -> Duration {
    Duration::seconds(MOTION_STEP_SECONDS)
}

/// Geocentric equatorial position scaled by [`DISPLAY_SCALE`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cartesian {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Position of one body at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub cartesian: Cartesian,
    /// Ecliptic longitude in degrees, always in `[0, 360)`
    pub ecliptic_longitude_deg: f64,
    pub ecliptic_latitude_deg: f64,
    /// Longitude change over the motion step, in `(-180, 180]`
    pub longitude_delta_deg: f64,
    pub zodiac_sign: ZodiacSign,
    pub is_retrograde: bool,
}

/// Spherical to Cartesian conversion of an equatorial sample, in display units.
pub fn display_cartesian(sample: &EphemerisSample) -> Cartesian {
    let r = sample.distance_au * DISPLAY_SCALE;
    let (sin_ra, cos_ra) = sample.right_ascension_rad.sin_cos();
    let (sin_dec, cos_dec) = sample.declination_rad.sin_cos();
    Cartesian {
        x: r * cos_dec * cos_ra,
        y: r * cos_dec * sin_ra,
        z: r * sin_dec,
    }
}

/// Fold a longitude difference into `(-180, 180]` so motion across 0° reads correctly.
pub fn normalize_delta(delta: f64) -> f64 {
    let folded = delta.rem_euclid(360.0);
    if folded > 180.0 {
        folded - 360.0
    } else {
        folded
    }
}

/// Retrograde iff longitude decreases; the Sun and Moon never are.
pub fn is_retrograde(body: TrackedBody, delta: f64) -> bool {
    !body.is_luminary() && delta < 0.0
}

/// Turns provider samples into [`BodyPosition`]s
pub struct PositionCalculator<'a, P: EphemerisProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: EphemerisProvider + ?Sized> PositionCalculator<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// Compute every requested body at `instant`.
    ///
    /// Fails as a whole if any single body cannot be computed.
    pub fn compute(
        &self,
        instant: DateTime<Utc>,
        bodies: &[TrackedBody],
    ) -> Result<BTreeMap<TrackedBody, BodyPosition>, ChartError> {
        self.check_instant(instant)?;

        let mut positions = BTreeMap::new();
        for &body in bodies {
            let position = self.compute_body(body, instant)?;
            positions.insert(body, position);
        }

        let retrograde = positions.values().filter(|p| p.is_retrograde).count();
        log::info!(
            "Computed {} bodies at {} via {} ({} retrograde)",
            positions.len(),
            instant,
            self.provider.name(),
            retrograde
        );
        Ok(positions)
    }

    /// Compute a single body. Does not re-validate `instant`.
    pub fn compute_body(&self, body: TrackedBody, instant: DateTime<Utc>) -> Result<BodyPosition, ChartError> {
        let (now, later) = self
            .provider
            .query_motion(body.key(), instant, motion_step())
            .map_err(|source| ChartError::ProviderUnavailable { body, instant, source })?;

        let longitude = normalize_degrees(now.ecliptic_longitude_deg);
        let delta = normalize_delta(normalize_degrees(later.ecliptic_longitude_deg) - longitude);
        let position = BodyPosition {
            cartesian: display_cartesian(&now),
            ecliptic_longitude_deg: longitude,
            ecliptic_latitude_deg: now.ecliptic_latitude_deg,
            longitude_delta_deg: delta,
            zodiac_sign: sign_for(longitude),
            is_retrograde: is_retrograde(body, delta),
        };

        log::debug!(
            "{}: {:.4}° {} delta {:+.6}°{}",
            body,
            longitude,
            position.zodiac_sign,
            delta,
            if position.is_retrograde { " (R)" } else { "" }
        );
        Ok(position)
    }

    /// Both samples of the run must fall inside the provider's range.
    fn check_instant(&self, instant: DateTime<Utc>) -> Result<(), ChartError> {
        let (start, end) = self.provider.supported_range();
        let invalid = || ChartError::InvalidInstant {
            input: instant.to_rfc3339(),
            reason: format!(
                "outside the {} ephemeris range {} .. {}",
                self.provider.name(),
                start,
                end
            ),
        };
        let later = instant.checked_add_signed(motion_step()).ok_or_else(invalid)?;
        if !self.provider.supports(instant) || !self.provider.supports(later) {
            return Err(invalid());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_delta_wraparound() {
        assert!((normalize_delta(0.3 - 359.5) - 0.8).abs() < 1e-9);
        assert!((normalize_delta(359.5 - 0.3) + 0.8).abs() < 1e-9);
        assert_eq!(normalize_delta(-180.0), 180.0);
        assert_eq!(normalize_delta(180.0), 180.0);
        assert_eq!(normalize_delta(-1.0), -1.0);
    }

    #[test]
    fn test_luminaries_never_retrograde() {
        assert!(!is_retrograde(TrackedBody::Sun, -5.0));
        assert!(!is_retrograde(TrackedBody::Moon, -0.01));
        assert!(is_retrograde(TrackedBody::Saturn, -0.01));
        assert!(!is_retrograde(TrackedBody::Saturn, 0.0));
    }

    #[test]
    fn test_display_cartesian_scale() {
        let sample = EphemerisSample {
            ecliptic_longitude_deg: 0.0,
            ecliptic_latitude_deg: 0.0,
            right_ascension_rad: 0.0,
            declination_rad: 0.0,
            distance_au: 1.5,
        };
        let c = display_cartesian(&sample);
        assert!((c.x - 150.0).abs() < 1e-9);
        assert!(c.y.abs() < 1e-9);
        assert!(c.z.abs() < 1e-9);

        let pole = EphemerisSample { declination_rad: std::f64::consts::FRAC_PI_2, ..sample };
        let c = display_cartesian(&pole);
        assert!((c.z - 150.0).abs() < 1e-9);
        assert!(c.x.abs() < 1e-9);
    }
}
