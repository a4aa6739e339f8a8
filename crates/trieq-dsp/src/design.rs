//! Coefficient designers
//!
//! Pure functions from a settings snapshot and a sample rate to biquad
//! coefficients. None of them allocate, so they may run at the start of
//! every audio block.
//!
//! Inputs are not validated: a frequency at or above Nyquist yields a
//! degenerate filter. Callers keep the snapshot inside the parameter ranges.

use trieq_core::{Decibels, EqSettings, Slope, MAX_CUT_STAGES};

use crate::biquad::{butterworth_q, BiquadCoeffs};

/// Which side a cut cascade removes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutKind {
    /// Highpass cascade (removes lows)
    LowCut,
    /// Lowpass cascade (removes highs)
    HighCut,
}

/// Ordered Butterworth sections for one cut stage, at most four
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutCoefficients {
    sections: [BiquadCoeffs; MAX_CUT_STAGES],
    len: usize,
}

impl CutCoefficients {
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[BiquadCoeffs] {
        &self.sections[..self.len]
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&BiquadCoeffs> {
        self.as_slice().get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BiquadCoeffs> {
        self.as_slice().iter()
    }
}

/// Peaking (bell) section for the snapshot's peak controls
pub fn design_peak(settings: &EqSettings, sample_rate: f64) -> BiquadCoeffs {
    BiquadCoeffs::peaking(
        settings.peak_freq,
        settings.peak_q,
        Decibels(settings.peak_gain_db).to_gain(),
        sample_rate,
    )
}

/// Split an `order`-th order Butterworth response into `order / 2` sections.
///
/// Every section shares the cutoff; the Q values are the conjugate pole
/// pairs of the full order, so the cascade is flat in the passband and
/// -3 dB at the cutoff. Odd orders are rounded down and the result is
/// capped at four sections.
pub fn design_cut_cascade(
    kind: CutKind,
    cutoff: f64,
    sample_rate: f64,
    order: usize,
) -> CutCoefficients {
    let order = (order & !1).clamp(2, 2 * MAX_CUT_STAGES);
    let len = order / 2;

    let mut sections = [BiquadCoeffs::bypass(); MAX_CUT_STAGES];
    for (index, section) in sections.iter_mut().take(len).enumerate() {
        let q = butterworth_q(order, index);
        *section = match kind {
            CutKind::LowCut => BiquadCoeffs::highpass(cutoff, q, sample_rate),
            CutKind::HighCut => BiquadCoeffs::lowpass(cutoff, q, sample_rate),
        };
    }

    CutCoefficients { sections, len }
}

/// Low-cut cascade for the snapshot
pub fn design_low_cut(settings: &EqSettings, sample_rate: f64) -> CutCoefficients {
    design_cut_cascade(
        CutKind::LowCut,
        settings.low_cut_freq,
        sample_rate,
        settings.low_cut_slope.order(),
    )
}

/// High-cut cascade for the snapshot
pub fn design_high_cut(settings: &EqSettings, sample_rate: f64) -> CutCoefficients {
    design_cut_cascade(
        CutKind::HighCut,
        settings.high_cut_freq,
        sample_rate,
        settings.high_cut_slope.order(),
    )
}

/// Everything one recompute produces, ready to hand to any number of chains
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainCoefficients {
    pub low_cut: CutCoefficients,
    pub low_cut_slope: Slope,
    pub peak: BiquadCoeffs,
    pub high_cut: CutCoefficients,
    pub high_cut_slope: Slope,
}

impl ChainCoefficients {
    pub fn design(settings: &EqSettings, sample_rate: f64) -> Self {
        Self {
            low_cut: design_low_cut(settings, sample_rate),
            low_cut_slope: settings.low_cut_slope,
            peak: design_peak(settings, sample_rate),
            high_cut: design_high_cut(settings, sample_rate),
            high_cut_slope: settings.high_cut_slope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SR: f64 = 44100.0;

    #[test]
    fn test_section_count_follows_slope() {
        for slope in Slope::ALL {
            let settings = EqSettings {
                low_cut_slope: slope,
                high_cut_slope: slope,
                ..Default::default()
            };
            assert_eq!(design_low_cut(&settings, SR).len(), slope.db_per_octave() as usize / 12);
            assert_eq!(design_high_cut(&settings, SR).len(), slope.stages());
        }
    }

    #[test]
    fn test_odd_and_oversized_orders() {
        assert_eq!(design_cut_cascade(CutKind::LowCut, 100.0, SR, 5).len(), 2);
        assert_eq!(design_cut_cascade(CutKind::LowCut, 100.0, SR, 16).len(), 4);
        assert_eq!(design_cut_cascade(CutKind::LowCut, 100.0, SR, 0).len(), 1);
    }

    #[test]
    fn test_cascade_is_minus_3db_at_cutoff() {
        for order in [2, 4, 6, 8] {
            let hp = design_cut_cascade(CutKind::LowCut, 1000.0, SR, order);
            let lp = design_cut_cascade(CutKind::HighCut, 1000.0, SR, order);
            let hp_mag: f64 = hp.iter().map(|c| c.magnitude(1000.0, SR)).product();
            let lp_mag: f64 = lp.iter().map(|c| c.magnitude(1000.0, SR)).product();
            assert_relative_eq!(hp_mag, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
            assert_relative_eq!(lp_mag, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_peak_zero_gain_is_flat() {
        let settings = EqSettings {
            peak_freq: 2000.0,
            peak_gain_db: 0.0,
            peak_q: 4.0,
            ..Default::default()
        };
        let peak = design_peak(&settings, SR);
        for freq in [20.0, 500.0, 2000.0, 9000.0, 20000.0] {
            assert_relative_eq!(peak.magnitude(freq, SR), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_design_is_pure() {
        let settings = EqSettings::default();
        assert_eq!(
            ChainCoefficients::design(&settings, SR),
            ChainCoefficients::design(&settings, SR)
        );
    }
}
