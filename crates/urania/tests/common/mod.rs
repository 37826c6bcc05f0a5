#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use urania::ephemeris::{EphemerisError, EphemerisProvider, EphemerisSample};
use urania::TrackedBody;

pub fn base_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

/// Provider answering fixed longitudes: one value at the base instant and
/// another at any later instant.
pub struct StubEphemeris {
    base: DateTime<Utc>,
    longitudes: HashMap<String, (f64, f64)>,
    failing: Option<String>,
    pub calls: Mutex<Vec<(String, DateTime<Utc>)>>,
}

impl StubEphemeris {
    pub fn new(base: DateTime<Utc>) -> Self {
        Self {
            base,
            longitudes: HashMap::new(),
            failing: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every body stationary at the given longitudes
    pub fn stationary(base: DateTime<Utc>, lons: &[(TrackedBody, f64)]) -> Self {
        let mut stub = Self::new(base);
        for (body, lon) in lons {
            stub = stub.with_motion(*body, *lon, *lon);
        }
        stub
    }

    pub fn with_motion(mut self, body: TrackedBody, now: f64, later: f64) -> Self {
        self.longitudes.insert(body.key().to_string(), (now, later));
        self
    }

    pub fn failing_on(mut self, body: TrackedBody) -> Self {
        self.failing = Some(body.key().to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl EphemerisProvider for StubEphemeris {
    fn name(&self) -> &str {
        "stub"
    }

    fn supported_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    fn query(&self, key: &str, instant: DateTime<Utc>) -> Result<EphemerisSample, EphemerisError> {
        self.calls.lock().unwrap().push((key.to_string(), instant));

        if self.failing.as_deref() == Some(key) {
            return Err(EphemerisError::FileNotFound {
                path: "de421.bsp".to_string(),
                message: "stub failure".to_string(),
            });
        }
        let (now, later) = self
            .longitudes
            .get(key)
            .copied()
            .ok_or_else(|| EphemerisError::UnknownBody { key: key.to_string() })?;
        let lon = if instant == self.base { now } else { later };

        Ok(EphemerisSample {
            ecliptic_longitude_deg: lon,
            ecliptic_latitude_deg: 0.0,
            right_ascension_rad: lon.to_radians(),
            declination_rad: 0.0,
            distance_au: 1.0,
        })
    }
}

/// All ten bodies, stationary, at the given longitudes in chart order
pub fn full_stub(lons: [f64; 10]) -> StubEphemeris {
    let pairs: Vec<(TrackedBody, f64)> = TrackedBody::ALL.iter().copied().zip(lons).collect();
    StubEphemeris::stationary(base_instant(), &pairs)
}
