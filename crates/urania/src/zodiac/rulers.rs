//! Sign rulers.
//!
//! Maps zodiac signs to the body that rules them. The ruler of a sign is the
//! "focus planet" of that sign's report.

use crate::bodies::TrackedBody;
use crate::zodiac::ZodiacSign;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which rulership table to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RulerScheme {
    /// Traditional rulers for the inner signs, Uranus and Neptune for Aquarius and Pisces.
    #[default]
    Hybrid,
    /// Classical seven-planet rulerships.
    Traditional,
    /// Outer planets rule Scorpio, Aquarius and Pisces.
    Modern,
}

const HYBRID_RULERS: [TrackedBody; 12] = [
    TrackedBody::Mars,    // Aries
    TrackedBody::Venus,   // Taurus
    TrackedBody::Mercury, // Gemini
    TrackedBody::Moon,    // Cancer
    TrackedBody::Sun,     // Leo
    TrackedBody::Mercury, // Virgo
    TrackedBody::Venus,   // Libra
    TrackedBody::Mars,    // Scorpio
    TrackedBody::Jupiter, // Sagittarius
    TrackedBody::Saturn,  // Capricorn
    TrackedBody::Uranus,  // Aquarius
    TrackedBody::Neptune, // Pisces
];

const TRADITIONAL_RULERS: [TrackedBody; 12] = [
    TrackedBody::Mars,
    TrackedBody::Venus,
    TrackedBody::Mercury,
    TrackedBody::Moon,
    TrackedBody::Sun,
    TrackedBody::Mercury,
    TrackedBody::Venus,
    TrackedBody::Mars,    // Scorpio (traditional)
    TrackedBody::Jupiter,
    TrackedBody::Saturn,
    TrackedBody::Saturn,  // Aquarius (traditional)
    TrackedBody::Jupiter, // Pisces (traditional)
];

const MODERN_RULERS: [TrackedBody; 12] = [
    TrackedBody::Mars,
    TrackedBody::Venus,
    TrackedBody::Mercury,
    TrackedBody::Moon,
    TrackedBody::Sun,
    TrackedBody::Mercury,
    TrackedBody::Venus,
    TrackedBody::Pluto,   // Scorpio (modern)
    TrackedBody::Jupiter,
    TrackedBody::Saturn,
    TrackedBody::Uranus,  // Aquarius (modern)
    TrackedBody::Neptune, // Pisces (modern)
];

/// Get the ruling body of a sign
pub fn ruler_of(sign: ZodiacSign, scheme: RulerScheme) -> TrackedBody {
    let table = match scheme {
        RulerScheme::Hybrid => &HYBRID_RULERS,
        RulerScheme::Traditional => &TRADITIONAL_RULERS,
        RulerScheme::Modern => &MODERN_RULERS,
    };
    table[sign.index()]
}

/// Full sign -> ruler table, in sign order
pub fn ruler_table(scheme: RulerScheme) -> BTreeMap<ZodiacSign, TrackedBody> {
    ZodiacSign::ALL
        .iter()
        .map(|&sign| (sign, ruler_of(sign, scheme)))
        .collect()
}
