use crate::aspects::types::{Aspect, AspectDefinition, ASPECT_TABLE};
use crate::bodies::TrackedBody;
use std::collections::BTreeMap;

/// Shortest-arc distance between two longitudes, in `[0, 180]`
pub fn angular_separation(lon1: f64, lon2: f64) -> f64 {
    let diff = (lon1 - lon2).abs();
    diff.min(360.0 - diff)
}

/// Aspect detector.
///
/// Definitions are tested in order and the first one whose orb contains the
/// separation wins, even if a later definition's ideal angle is closer.
#[derive(Debug, Clone)]
pub struct AspectDetector {
    definitions: Vec<AspectDefinition>,
}

impl AspectDetector {
    pub fn new() -> Self {
        Self::with_definitions(ASPECT_TABLE.to_vec())
    }

    /// Use a custom table; its order is the match priority.
    pub fn with_definitions(definitions: Vec<AspectDefinition>) -> Self {
        Self { definitions }
    }

    pub fn definitions(&self) -> &[AspectDefinition] {
        &self.definitions
    }

    /// First definition matching `separation`, orb bounds inclusive
    pub fn classify(&self, separation: f64) -> Option<&AspectDefinition> {
        self.definitions
            .iter()
            .find(|def| (separation - def.angle_deg).abs() <= def.orb_deg)
    }

    /// Aspect between two bodies, if any
    pub fn aspect_between(&self, body1: TrackedBody, lon1: f64, body2: TrackedBody, lon2: f64) -> Option<Aspect> {
        let separation = angular_separation(lon1, lon2);
        self.classify(separation).map(|def| Aspect {
            body1,
            body2,
            kind: def.kind,
            separation_deg: separation,
            deviation_deg: (separation - def.angle_deg).abs(),
        })
    }

    /// Check every unordered pair of bodies once, in body order.
    pub fn detect(&self, longitudes: &BTreeMap<TrackedBody, f64>) -> Vec<Aspect> {
        let bodies: Vec<(TrackedBody, f64)> = longitudes.iter().map(|(b, lon)| (*b, *lon)).collect();

        let mut aspects = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let (b1, lon1) = bodies[i];
                let (b2, lon2) = bodies[j];
                if let Some(aspect) = self.aspect_between(b1, lon1, b2, lon2) {
                    aspects.push(aspect);
                }
            }
        }

        log::debug!("{} aspects among {} bodies", aspects.len(), bodies.len());
        aspects
    }
}

impl Default for AspectDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect aspects with the standard table
pub fn detect_aspects(longitudes: &BTreeMap<TrackedBody, f64>) -> Vec<Aspect> {
    AspectDetector::new().detect(longitudes)
}
