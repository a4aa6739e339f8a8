//! Per-channel filter chain: low-cut → peak → high-cut
//!
//! One chain per audio channel. Coefficients are replaced between blocks;
//! `process` never allocates and cannot fail.

use trieq_core::{validate_sample_rate, EqError, EqResult, Sample, DEFAULT_SAMPLE_RATE};

use crate::biquad::{BiquadCoeffs, BiquadTDF2};
use crate::cascade::{apply_cascade, CutStage};
use crate::design::ChainCoefficients;
use crate::{MonoProcessor, Processor};

/// Stage position inside the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainPosition {
    LowCut,
    Peak,
    HighCut,
}

/// Three-stage mono filter chain
#[derive(Debug, Clone)]
pub struct MonoChain {
    low_cut: CutStage,
    peak: BiquadTDF2,
    high_cut: CutStage,
    sample_rate: f64,
    max_block_size: usize,
}

impl MonoChain {
    pub fn new() -> Self {
        Self {
            low_cut: CutStage::new(),
            peak: BiquadTDF2::new(),
            high_cut: CutStage::new(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_block_size: 0,
        }
    }

    /// Reset all feedback memory for a new stream configuration
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> EqResult<()> {
        let sample_rate = validate_sample_rate(sample_rate)?;
        if max_block_size == 0 {
            return Err(EqError::InvalidBlockSize(max_block_size));
        }

        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.reset();

        log::debug!(
            "MonoChain prepared: {} Hz, max block {}",
            sample_rate,
            max_block_size
        );
        Ok(())
    }

    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[inline]
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    #[inline]
    pub fn low_cut(&self) -> &CutStage {
        &self.low_cut
    }

    #[inline]
    pub fn peak(&self) -> &BiquadTDF2 {
        &self.peak
    }

    #[inline]
    pub fn high_cut(&self) -> &CutStage {
        &self.high_cut
    }

    /// Swap one slot's coefficients. The peak stage has a single slot (0).
    pub fn replace_coefficients(&mut self, position: ChainPosition, slot: usize, coeffs: BiquadCoeffs) {
        match position {
            ChainPosition::LowCut => self.low_cut.set_slot(slot, coeffs),
            ChainPosition::Peak => {
                debug_assert_eq!(slot, 0, "peak stage has one slot");
                self.peak.set_coeffs(coeffs);
            }
            ChainPosition::HighCut => self.high_cut.set_slot(slot, coeffs),
        }
    }

    /// Load a full recompute: peak section plus both cascades
    pub fn apply(&mut self, coeffs: &ChainCoefficients) {
        self.peak.set_coeffs(coeffs.peak);
        apply_cascade(&mut self.low_cut, &coeffs.low_cut, coeffs.low_cut_slope);
        apply_cascade(&mut self.high_cut, &coeffs.high_cut, coeffs.high_cut_slope);
    }

    /// Process one block in place. Once prepared, blocks must fit `max_block_size`.
    #[inline]
    pub fn process(&mut self, buffer: &mut [Sample]) {
        debug_assert!(
            self.max_block_size == 0 || buffer.len() <= self.max_block_size,
            "block of {} exceeds prepared size {}",
            buffer.len(),
            self.max_block_size
        );
        self.low_cut.process(buffer);
        self.peak.process_block(buffer);
        self.high_cut.process(buffer);
    }

    /// Composite magnitude of every active section at `freq`
    pub fn magnitude(&self, freq: f64, sample_rate: f64) -> f64 {
        self.low_cut.magnitude(freq, sample_rate)
            * self.peak.coeffs().magnitude(freq, sample_rate)
            * self.high_cut.magnitude(freq, sample_rate)
    }
}

impl Default for MonoChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for MonoChain {
    fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.reset();
        self.high_cut.reset();
    }
}

impl MonoProcessor for MonoChain {
    #[inline]
    fn process_sample(&mut self, input: Sample) -> Sample {
        let mut block = [input];
        self.process(&mut block);
        block[0]
    }

    fn process_block(&mut self, buffer: &mut [Sample]) {
        self.process(buffer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trieq_core::{EqSettings, Slope};

    const SR: f64 = 48000.0;

    #[test]
    fn test_prepare_validates() {
        let mut chain = MonoChain::new();
        assert!(chain.prepare(SR, 512).is_ok());
        assert!(matches!(chain.prepare(0.0, 512), Err(EqError::InvalidSampleRate(_))));
        assert!(matches!(chain.prepare(f64::NAN, 512), Err(EqError::InvalidSampleRate(_))));
        assert!(matches!(chain.prepare(SR, 0), Err(EqError::InvalidBlockSize(0))));
        assert_eq!(chain.sample_rate(), SR);
    }

    #[test]
    fn test_unconfigured_chain_passes_through() {
        let mut chain = MonoChain::new();
        let mut buffer: Vec<f64> = (0..64).map(|i| (i as f64 * 0.1).sin()).collect();
        let expected = buffer.clone();
        chain.process(&mut buffer);
        assert_eq!(buffer, expected);
    }

    #[test]
    fn test_prepare_clears_state() {
        let mut chain = MonoChain::new();
        chain.prepare(SR, 64).unwrap();
        chain.apply(&ChainCoefficients::design(&EqSettings::default(), SR));
        let mut buffer = vec![1.0; 64];
        chain.process(&mut buffer);
        assert_ne!(chain.peak().state(), (0.0, 0.0));

        chain.prepare(SR, 64).unwrap();
        assert_eq!(chain.peak().state(), (0.0, 0.0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "exceeds prepared size")]
    fn test_oversized_block_is_caught() {
        let mut chain = MonoChain::new();
        chain.prepare(SR, 64).unwrap();
        let mut buffer = vec![0.0; 65];
        chain.process(&mut buffer);
    }

    #[test]
    fn test_replace_coefficients() {
        let mut chain = MonoChain::new();
        let coeffs = BiquadCoeffs::lowpass(1000.0, 0.7, SR);
        chain.replace_coefficients(ChainPosition::HighCut, 2, coeffs);
        chain.replace_coefficients(ChainPosition::Peak, 0, coeffs);
        assert_eq!(chain.high_cut().slot(2).map(|f| *f.coeffs()), Some(coeffs));
        assert_eq!(*chain.peak().coeffs(), coeffs);
        // Replacing coefficients does not change which slots are active
        assert_eq!(chain.high_cut().active_count(), 0);
    }

    #[test]
    fn test_apply_sets_active_counts() {
        let mut chain = MonoChain::new();
        let settings = EqSettings {
            low_cut_slope: Slope::Db48,
            high_cut_slope: Slope::Db24,
            ..Default::default()
        };
        chain.apply(&ChainCoefficients::design(&settings, SR));
        assert_eq!(chain.low_cut().active_count(), 4);
        assert_eq!(chain.high_cut().active_count(), 2);
    }
}
