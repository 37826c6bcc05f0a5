pub mod keplerian;
pub mod provider;
#[cfg(feature = "swiss-ephemeris")]
pub mod swiss;
pub mod time;
pub mod types;

pub use keplerian::KeplerianEphemeris;
pub use provider::EphemerisProvider;
#[cfg(feature = "swiss-ephemeris")]
pub use swiss::SwissEphemerisAdapter;
pub use types::{EphemerisError, EphemerisSample};
