//! Settings snapshot consumed by the filter designers

use serde::{Deserialize, Serialize};

use crate::MIN_FREQUENCY;

/// Highest design frequency as a fraction of the sample rate
pub const NYQUIST_GUARD: f64 = 0.499;

/// Number of biquad slots in a cut stage
pub const MAX_CUT_STAGES: usize = 4;

/// Roll-off steepness of a cut filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Slope {
    #[default]
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    /// Choice index (0..=3)
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Slope::Db12 => 0,
            Slope::Db24 => 1,
            Slope::Db36 => 2,
            Slope::Db48 => 3,
        }
    }

    /// Slope for a choice index, saturating at the steepest level
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Slope::Db12,
            1 => Slope::Db24,
            2 => Slope::Db36,
            _ => Slope::Db48,
        }
    }

    /// Slope for a raw choice parameter value
    pub fn from_choice(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self::from_index(value.round() as usize)
        } else {
            Slope::Db12
        }
    }

    #[inline]
    pub fn db_per_octave(self) -> f64 {
        12.0 * self.stages() as f64
    }

    /// Butterworth order realizing this slope
    #[inline]
    pub fn order(self) -> usize {
        2 * self.stages()
    }

    /// Number of active biquad slots
    #[inline]
    pub fn stages(self) -> usize {
        self.index() + 1
    }

    pub fn label(self) -> &'static str {
        match self {
            Slope::Db12 => "12 dB/Oct",
            Slope::Db24 => "24 dB/Oct",
            Slope::Db36 => "36 dB/Oct",
            Slope::Db48 => "48 dB/Oct",
        }
    }
}

/// One snapshot of the user-facing controls
///
/// Frequencies in Hz, gain in dB. Values are taken as-is by the designers;
/// keeping them inside the parameter ranges is the store's job, and keeping
/// them below Nyquist is done with [`EqSettings::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqSettings {
    pub low_cut_freq: f64,
    pub high_cut_freq: f64,
    pub peak_freq: f64,
    pub peak_gain_db: f64,
    pub peak_q: f64,
    pub low_cut_slope: Slope,
    pub high_cut_slope: Slope,
}

impl Default for EqSettings {
    fn default() -> Self {
        Self {
            low_cut_freq: 20.0,
            high_cut_freq: 20000.0,
            peak_freq: 750.0,
            peak_gain_db: 0.0,
            peak_q: 1.0,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
        }
    }
}

impl EqSettings {
    /// Copy with every frequency pulled into `[MIN_FREQUENCY, 0.499 * sample_rate]`
    pub fn clamped(&self, sample_rate: f64) -> Self {
        let upper = sample_rate * NYQUIST_GUARD;
        let lower = MIN_FREQUENCY.min(upper);
        let clamp = |freq: f64| freq.min(upper).max(lower);

        Self {
            low_cut_freq: clamp(self.low_cut_freq),
            high_cut_freq: clamp(self.high_cut_freq),
            peak_freq: clamp(self.peak_freq),
            ..*self
        }
    }
}
