pub mod detector;
pub mod types;

pub use detector::{angular_separation, detect_aspects, AspectDetector};
pub use types::{Aspect, AspectDefinition, AspectKind, ASPECT_TABLE};
