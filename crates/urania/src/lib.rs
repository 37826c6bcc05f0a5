//! Planetary positions, zodiac signs, retrograde motion and aspects for a
//! single instant.

pub mod aspects;
pub mod bodies;
pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod motion;
pub mod zodiac;

pub use aspects::{detect_aspects, Aspect, AspectDetector, AspectKind};
pub use bodies::TrackedBody;
pub use chart::{parse_instant, ChartCalculator, ChartRecord, ChartSnapshot, SignReport};
pub use ephemeris::{EphemerisError, EphemerisProvider, EphemerisSample, KeplerianEphemeris};
pub use error::ChartError;
pub use motion::{BodyPosition, PositionCalculator, DISPLAY_SCALE};
pub use zodiac::{sign_for, RulerScheme, ZodiacSign};
