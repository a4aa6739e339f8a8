//! trieq-core: Shared types for the TriEq filter chain
//!
//! Settings snapshots, parameter ranges, the lock-free parameter store
//! and the error type used by the non-real-time edges.

mod error;
mod params;
mod sample;
mod settings;
mod store;

pub use error::*;
pub use params::*;
pub use sample::*;
pub use settings::*;
pub use store::*;

/// Lowest frequency exposed by any control (Hz)
pub const MIN_FREQUENCY: f64 = 20.0;

/// Highest frequency exposed by any control (Hz)
pub const MAX_FREQUENCY: f64 = 20000.0;

/// Default sample rate used when nothing better is known
pub const DEFAULT_SAMPLE_RATE: f64 = 48000.0;

/// Decibel value wrapper
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Decibels(pub f64);

impl Decibels {
    pub const ZERO: Self = Self(0.0);
    pub const NEG_INF: Self = Self(f64::NEG_INFINITY);

    #[inline]
    pub fn from_gain(gain: f64) -> Self {
        if gain <= 0.0 {
            Self::NEG_INF
        } else {
            Self(20.0 * gain.log10())
        }
    }

    #[inline]
    pub fn to_gain(self) -> f64 {
        if self.0 <= -144.0 {
            0.0
        } else {
            10.0_f64.powf(self.0 / 20.0)
        }
    }
}

impl Default for Decibels {
    fn default() -> Self {
        Self::ZERO
    }
}
