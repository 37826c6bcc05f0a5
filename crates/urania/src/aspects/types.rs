use crate::bodies::TrackedBody;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Conjunction,
    Semisextile,
    Sextile,
    Square,
    Trine,
    Quincunx,
    Opposition,
}

impl AspectKind {
    pub const ALL: [AspectKind; 7] = [
        AspectKind::Conjunction,
        AspectKind::Semisextile,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Quincunx,
        AspectKind::Opposition,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Semisextile => "semisextile",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Opposition => "opposition",
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown aspect: {0}")]
pub struct UnknownAspect(pub String);

impl FromStr for AspectKind {
    type Err = UnknownAspect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        AspectKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownAspect(s.to_string()))
    }
}

/// One row of the aspect table: ideal angle and tolerance, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectDefinition {
    pub kind: AspectKind,
    pub angle_deg: f64,
    pub orb_deg: f64,
}

/// Standard aspect table, in match priority order.
pub const ASPECT_TABLE: [AspectDefinition; 7] = [
    AspectDefinition { kind: AspectKind::Conjunction, angle_deg: 0.0, orb_deg: 10.0 },
    AspectDefinition { kind: AspectKind::Semisextile, angle_deg: 30.0, orb_deg: 2.0 },
    AspectDefinition { kind: AspectKind::Sextile, angle_deg: 60.0, orb_deg: 6.0 },
    AspectDefinition { kind: AspectKind::Square, angle_deg: 90.0, orb_deg: 8.0 },
    AspectDefinition { kind: AspectKind::Trine, angle_deg: 120.0, orb_deg: 8.0 },
    AspectDefinition { kind: AspectKind::Quincunx, angle_deg: 150.0, orb_deg: 2.0 },
    AspectDefinition { kind: AspectKind::Opposition, angle_deg: 180.0, orb_deg: 10.0 },
];

/// An aspect found between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aspect {
    /// Earlier of the two bodies in chart order
    pub body1: TrackedBody,
    pub body2: TrackedBody,
    pub kind: AspectKind,
    /// Shortest-arc separation, 0-180 degrees
    pub separation_deg: f64,
    /// Distance from the aspect's ideal angle
    pub deviation_deg: f64,
}
