//! Full chart calculation and the records handed to downstream consumers.

use crate::aspects::{Aspect, AspectDetector, AspectKind};
use crate::bodies::TrackedBody;
use crate::ephemeris::EphemerisProvider;
use crate::error::ChartError;
use crate::motion::{BodyPosition, PositionCalculator};
use crate::zodiac::{ruler_of, ruler_table, RulerScheme, ZodiacSign};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a caller-supplied instant.
///
/// Accepts RFC 3339 with any offset, or a naive date-time which is read as UTC.
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>, ChartError> {
    let trimmed = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(ChartError::InvalidInstant {
        input: input.to_string(),
        reason: "expected RFC 3339 or YYYY-MM-DDTHH:MM:SS[.fff] (UTC)".to_string(),
    })
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ`, milliseconds truncated
pub fn format_time_utc(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Everything computed for one instant
#[derive(Debug, Clone)]
pub struct ChartSnapshot {
    pub instant: DateTime<Utc>,
    pub positions: BTreeMap<TrackedBody, BodyPosition>,
    pub aspects: Vec<Aspect>,
    pub ruler_scheme: RulerScheme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub zodiac: ZodiacSign,
    pub retrograde: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRecord {
    pub planet1: TrackedBody,
    pub planet2: TrackedBody,
    pub aspect: AspectKind,
    /// Separation in degrees, rounded to 2 decimals
    pub angle: f64,
    pub sign1: ZodiacSign,
    pub sign2: ZodiacSign,
}

/// Serialized form of a [`ChartSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub time_utc: String,
    pub positions: BTreeMap<TrackedBody, PositionRecord>,
    pub aspects: Vec<AspectRecord>,
    pub zodiac_rulers: BTreeMap<ZodiacSign, TrackedBody>,
}

/// Chart record focused on one sign and its ruling planet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignReport {
    pub time_utc: String,
    pub zodiac_sign: ZodiacSign,
    pub focus_planet: TrackedBody,
    pub positions: BTreeMap<TrackedBody, PositionRecord>,
    pub aspects: Vec<AspectRecord>,
    pub zodiac_rulers: BTreeMap<ZodiacSign, TrackedBody>,
}

impl ChartSnapshot {
    /// Ecliptic longitudes keyed by body
    pub fn longitudes(&self) -> BTreeMap<TrackedBody, f64> {
        self.positions
            .iter()
            .map(|(body, pos)| (*body, pos.ecliptic_longitude_deg))
            .collect()
    }

    pub fn record(&self) -> ChartRecord {
        let positions = self
            .positions
            .iter()
            .map(|(body, pos)| {
                (
                    *body,
                    PositionRecord {
                        x: pos.cartesian.x,
                        y: pos.cartesian.y,
                        z: pos.cartesian.z,
                        zodiac: pos.zodiac_sign,
                        retrograde: pos.is_retrograde,
                    },
                )
            })
            .collect();

        // Both bodies of every aspect must come from `positions`.
        let sign_of = |body: TrackedBody| {
            debug_assert!(
                self.positions.contains_key(&body),
                "aspect names {} which has no position",
                body
            );
            match self.positions.get(&body) {
                Some(p) => p.zodiac_sign,
                None => {
                    log::warn!("Aspect names {} which has no position; labelling it Aries", body);
                    ZodiacSign::Aries
                }
            }
        };
        let aspects = self
            .aspects
            .iter()
            .map(|a| AspectRecord {
                planet1: a.body1,
                planet2: a.body2,
                aspect: a.kind,
                angle: round2(a.separation_deg),
                sign1: sign_of(a.body1),
                sign2: sign_of(a.body2),
            })
            .collect();

        ChartRecord {
            time_utc: format_time_utc(self.instant),
            positions,
            aspects,
            zodiac_rulers: ruler_table(self.ruler_scheme),
        }
    }

    pub fn sign_report(&self, sign: ZodiacSign) -> SignReport {
        let ChartRecord {
            time_utc,
            positions,
            aspects,
            zodiac_rulers,
        } = self.record();
        SignReport {
            time_utc,
            zodiac_sign: sign,
            focus_planet: ruler_of(sign, self.ruler_scheme),
            positions,
            aspects,
            zodiac_rulers,
        }
    }

    /// One report per sign, Aries first
    pub fn sign_reports(&self) -> Vec<SignReport> {
        ZodiacSign::ALL.iter().map(|&sign| self.sign_report(sign)).collect()
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        let record = self.record();
        if pretty {
            serde_json::to_string_pretty(&record)
        } else {
            serde_json::to_string(&record)
        }
    }
}

/// Computes complete charts from an ephemeris provider
pub struct ChartCalculator<'a, P: EphemerisProvider + ?Sized> {
    provider: &'a P,
    detector: AspectDetector,
    ruler_scheme: RulerScheme,
}

impl<'a, P: EphemerisProvider + ?Sized> ChartCalculator<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            detector: AspectDetector::default(),
            ruler_scheme: RulerScheme::default(),
        }
    }

    pub fn with_detector(mut self, detector: AspectDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_ruler_scheme(mut self, scheme: RulerScheme) -> Self {
        self.ruler_scheme = scheme;
        self
    }

    /// Positions of all tracked bodies plus their aspects at `instant`
    pub fn calculate(&self, instant: DateTime<Utc>) -> Result<ChartSnapshot, ChartError> {
        let positions = PositionCalculator::new(self.provider).compute(instant, &TrackedBody::ALL)?;
        let longitudes: BTreeMap<TrackedBody, f64> = positions
            .iter()
            .map(|(body, pos)| (*body, pos.ecliptic_longitude_deg))
            .collect();
        let aspects = self.detector.detect(&longitudes);

        log::info!("Chart for {}: {} aspects", format_time_utc(instant), aspects.len());
        Ok(ChartSnapshot {
            instant,
            positions,
            aspects,
            ruler_scheme: self.ruler_scheme,
        })
    }
}
