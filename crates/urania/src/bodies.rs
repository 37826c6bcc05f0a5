//! The fixed set of bodies tracked by every chart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrackedBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

impl TrackedBody {
    /// All tracked bodies in chart order.
    pub const ALL: [TrackedBody; 10] = [
        TrackedBody::Sun,
        TrackedBody::Moon,
        TrackedBody::Mercury,
        TrackedBody::Venus,
        TrackedBody::Mars,
        TrackedBody::Jupiter,
        TrackedBody::Saturn,
        TrackedBody::Uranus,
        TrackedBody::Neptune,
        TrackedBody::Pluto,
    ];

    /// Display name, as used in chart records ("Sun", "Moon", ...)
    pub fn name(self) -> &'static str {
        match self {
            TrackedBody::Sun => "Sun",
            TrackedBody::Moon => "Moon",
            TrackedBody::Mercury => "Mercury",
            TrackedBody::Venus => "Venus",
            TrackedBody::Mars => "Mars",
            TrackedBody::Jupiter => "Jupiter",
            TrackedBody::Saturn => "Saturn",
            TrackedBody::Uranus => "Uranus",
            TrackedBody::Neptune => "Neptune",
            TrackedBody::Pluto => "Pluto",
        }
    }

    /// Lookup key handed to an ephemeris provider.
    pub fn key(self) -> &'static str {
        match self {
            TrackedBody::Sun => "sun",
            TrackedBody::Moon => "moon",
            TrackedBody::Mercury => "mercury",
            TrackedBody::Venus => "venus",
            TrackedBody::Mars => "mars",
            TrackedBody::Jupiter => "jupiter",
            TrackedBody::Saturn => "saturn",
            TrackedBody::Uranus => "uranus",
            TrackedBody::Neptune => "neptune",
            TrackedBody::Pluto => "pluto",
        }
    }

    /// Sun and Moon never station, so they are never reported retrograde.
    pub fn is_luminary(self) -> bool {
        matches!(self, TrackedBody::Sun | TrackedBody::Moon)
    }
}

impl fmt::Display for TrackedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown body: {0}")]
pub struct UnknownBody(pub String);

impl FromStr for TrackedBody {
    type Err = UnknownBody;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TrackedBody::ALL
            .iter()
            .copied()
            .find(|body| body.key() == wanted)
            .ok_or_else(|| UnknownBody(s.to_string()))
    }
}
