//! Tropical zodiac signs and the longitude classifier.

pub mod rulers;

pub use rulers::{ruler_of, ruler_table, RulerScheme};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

/// Width of every sign band in degrees.
pub const SIGN_WIDTH_DEG: f64 = 30.0;

/// Sign bands in ascending start-degree order. Each band is `[start, start + 30)`.
pub const SIGN_BANDS: [(ZodiacSign, f64); 12] = [
    (ZodiacSign::Aries, 0.0),
    (ZodiacSign::Taurus, 30.0),
    (ZodiacSign::Gemini, 60.0),
    (ZodiacSign::Cancer, 90.0),
    (ZodiacSign::Leo, 120.0),
    (ZodiacSign::Virgo, 150.0),
    (ZodiacSign::Libra, 180.0),
    (ZodiacSign::Scorpio, 210.0),
    (ZodiacSign::Sagittarius, 240.0),
    (ZodiacSign::Capricorn, 270.0),
    (ZodiacSign::Aquarius, 300.0),
    (ZodiacSign::Pisces, 330.0),
];

impl ZodiacSign {
    pub const ALL: [ZodiacSign; 12] = [
        ZodiacSign::Aries,
        ZodiacSign::Taurus,
        ZodiacSign::Gemini,
        ZodiacSign::Cancer,
        ZodiacSign::Leo,
        ZodiacSign::Virgo,
        ZodiacSign::Libra,
        ZodiacSign::Scorpio,
        ZodiacSign::Sagittarius,
        ZodiacSign::Capricorn,
        ZodiacSign::Aquarius,
        ZodiacSign::Pisces,
    ];

    /// Sign index (0 = Aries .. 11 = Pisces)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    /// Longitude where this sign's band begins.
    pub fn start_degree(self) -> f64 {
        SIGN_BANDS[self.index()].1
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown zodiac sign: {0}")]
pub struct UnknownSign(pub String);

impl FromStr for ZodiacSign {
    type Err = UnknownSign;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ZodiacSign::ALL
            .iter()
            .copied()
            .find(|sign| sign.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownSign(s.to_string()))
    }
}

/// Fold any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Classify an ecliptic longitude into its zodiac sign.
pub fn sign_for(longitude: f64) -> ZodiacSign {
    let lon = normalize_degrees(longitude);
    for (sign, start) in SIGN_BANDS {
        if start <= lon && lon < start + SIGN_WIDTH_DEG {
            return sign;
        }
    }
    // Only reachable for non-finite input
    if lon >= 330.0 {
        ZodiacSign::Pisces
    } else {
        ZodiacSign::Aries
    }
}
