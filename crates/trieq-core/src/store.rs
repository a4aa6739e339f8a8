//! Lock-free parameter store shared by the audio and UI threads
//!
//! Each parameter is an independent atomic cell. A snapshot reads them one
//! by one, so two fields may come from different writes; that is accepted.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::{AtomicParam, EqError, EqResult, EqSettings, ParamRange, Slope};

/// Identifies one control of the EQ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    LowCutFreq,
    HighCutFreq,
    PeakFreq,
    PeakGain,
    PeakQ,
    LowCutSlope,
    HighCutSlope,
}

const FREQ_SKEW: f64 = 0.25;

impl ParamId {
    pub const ALL: [ParamId; 7] = [
        ParamId::LowCutFreq,
        ParamId::HighCutFreq,
        ParamId::PeakFreq,
        ParamId::PeakGain,
        ParamId::PeakQ,
        ParamId::LowCutSlope,
        ParamId::HighCutSlope,
    ];

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }

    /// Stable string id
    pub fn name(self) -> &'static str {
        match self {
            ParamId::LowCutFreq => "LowCut Freq",
            ParamId::HighCutFreq => "HighCut Freq",
            ParamId::PeakFreq => "Peak Freq",
            ParamId::PeakGain => "Peak Gain",
            ParamId::PeakQ => "Peak Q",
            ParamId::LowCutSlope => "LowCut Slope",
            ParamId::HighCutSlope => "HighCut Slope",
        }
    }

    pub fn from_name(name: &str) -> EqResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name() == name)
            .ok_or_else(|| EqError::InvalidParam(format!("unknown parameter '{name}'")))
    }

    pub fn range(self) -> ParamRange {
        match self {
            ParamId::LowCutFreq => ParamRange::skewed(20.0, 20000.0, 1.0, FREQ_SKEW, 20.0),
            ParamId::HighCutFreq => ParamRange::skewed(20.0, 20000.0, 1.0, FREQ_SKEW, 20000.0),
            ParamId::PeakFreq => ParamRange::skewed(20.0, 20000.0, 1.0, FREQ_SKEW, 750.0),
            ParamId::PeakGain => ParamRange::linear(-24.0, 24.0, 0.5, 0.0),
            ParamId::PeakQ => ParamRange::linear(0.1, 10.0, 0.05, 1.0),
            ParamId::LowCutSlope | ParamId::HighCutSlope => ParamRange::linear(0.0, 3.0, 1.0, 0.0),
        }
    }

    pub fn is_choice(self) -> bool {
        matches!(self, ParamId::LowCutSlope | ParamId::HighCutSlope)
    }
}

/// The parameter store: one atomic cell per control plus a change flag
#[derive(Debug)]
pub struct EqParameters {
    values: [AtomicParam; 7],
    changed: AtomicBool,
}

impl EqParameters {
    pub fn new() -> Self {
        Self {
            values: ParamId::ALL.map(|id| AtomicParam::new(id.range().default)),
            changed: AtomicBool::new(true),
        }
    }

    /// Store with every control taken from a snapshot
    pub fn with_settings(settings: &EqSettings) -> Self {
        let params = Self::new();
        params.apply_settings(settings);
        params
    }

    #[inline]
    pub fn get(&self, id: ParamId) -> f64 {
        self.values[id.slot()].get()
    }

    /// Set a plain value, snapped to the control's step and range
    pub fn set(&self, id: ParamId, value: f64) {
        let snapped = id.range().snap(value);
        self.values[id.slot()].set(snapped);
        self.mark_changed();
    }

    /// Set from a 0-1 control position
    pub fn set_normalized(&self, id: ParamId, normalized: f64) {
        let range = id.range();
        self.set(id, range.denormalize(normalized));
    }

    pub fn normalized(&self, id: ParamId) -> f64 {
        id.range().normalize(self.get(id))
    }

    pub fn set_slope(&self, id: ParamId, slope: Slope) {
        debug_assert!(id.is_choice());
        self.set(id, slope.index() as f64);
    }

    /// Write every field of a snapshot
    pub fn apply_settings(&self, settings: &EqSettings) {
        self.set(ParamId::LowCutFreq, settings.low_cut_freq);
        self.set(ParamId::HighCutFreq, settings.high_cut_freq);
        self.set(ParamId::PeakFreq, settings.peak_freq);
        self.set(ParamId::PeakGain, settings.peak_gain_db);
        self.set(ParamId::PeakQ, settings.peak_q);
        self.set_slope(ParamId::LowCutSlope, settings.low_cut_slope);
        self.set_slope(ParamId::HighCutSlope, settings.high_cut_slope);
    }

    pub fn reset_to_defaults(&self) {
        for id in ParamId::ALL {
            self.values[id.slot()].set(id.range().default);
        }
        log::debug!("Parameters reset to defaults");
        self.mark_changed();
    }

    /// Read the current snapshot
    pub fn settings(&self) -> EqSettings {
        EqSettings {
            low_cut_freq: self.get(ParamId::LowCutFreq),
            high_cut_freq: self.get(ParamId::HighCutFreq),
            peak_freq: self.get(ParamId::PeakFreq),
            peak_gain_db: self.get(ParamId::PeakGain),
            peak_q: self.get(ParamId::PeakQ),
            low_cut_slope: Slope::from_choice(self.get(ParamId::LowCutSlope)),
            high_cut_slope: Slope::from_choice(self.get(ParamId::HighCutSlope)),
        }
    }

    #[inline]
    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }

    #[inline]
    pub fn has_changed(&self) -> bool {
        self.changed.load(Ordering::Acquire)
    }

    /// Check-and-reset of the change flag; true at most once per change burst
    #[inline]
    pub fn take_changed(&self) -> bool {
        self.changed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl Default for EqParameters {
    fn default() -> Self {
        Self::new()
    }
}
