//! Composite magnitude response for display
//!
//! Evaluates each active biquad on the unit circle; no FFT. Works on a
//! chain that is never fed audio, so sampling cannot disturb the audio path.

use trieq_core::{Decibels, MAX_FREQUENCY, MIN_FREQUENCY};

use crate::chain::MonoChain;

/// Log-spaced frequency axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRange {
    pub min_hz: f64,
    pub max_hz: f64,
}

impl FrequencyRange {
    pub fn new(min_hz: f64, max_hz: f64) -> Self {
        Self { min_hz, max_hz }
    }

    /// Map a 0-1 position onto the axis logarithmically
    #[inline]
    pub fn frequency_at(&self, proportion: f64) -> f64 {
        self.min_hz * (self.max_hz / self.min_hz).powf(proportion)
    }

    /// Inverse of `frequency_at`
    #[inline]
    pub fn proportion_of(&self, freq: f64) -> f64 {
        (freq / self.min_hz).ln() / (self.max_hz / self.min_hz).ln()
    }
}

impl Default for FrequencyRange {
    fn default() -> Self {
        Self::new(MIN_FREQUENCY, MAX_FREQUENCY)
    }
}

/// Samples a chain's magnitude response across a pixel width
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseSampler {
    range: FrequencyRange,
}

impl ResponseSampler {
    pub fn new(range: FrequencyRange) -> Self {
        Self { range }
    }

    #[inline]
    pub fn range(&self) -> FrequencyRange {
        self.range
    }

    /// Frequency shown at pixel column `index` of `width`
    #[inline]
    pub fn frequency_for_pixel(&self, index: usize, width: usize) -> f64 {
        self.range.frequency_at(index as f64 / width as f64)
    }

    /// One dB value per pixel column
    pub fn sample(&self, chain: &MonoChain, width: usize, sample_rate: f64) -> Vec<f64> {
        let mut magnitudes = vec![0.0; width];
        self.sample_into(chain, sample_rate, &mut magnitudes);
        magnitudes
    }

    /// Fill `out` with dB values, one per column
    pub fn sample_into(&self, chain: &MonoChain, sample_rate: f64, out: &mut [f64]) {
        let width = out.len();
        for (index, db) in out.iter_mut().enumerate() {
            let freq = self.frequency_for_pixel(index, width);
            *db = Decibels::from_gain(chain.magnitude(freq, sample_rate)).0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frequency_axis() {
        let sampler = ResponseSampler::default();
        assert_relative_eq!(sampler.frequency_for_pixel(0, 200), 20.0);
        assert_relative_eq!(sampler.frequency_for_pixel(100, 200), 632.4555320336759, max_relative = 1e-12);
        // Last column stays just below the top of the range
        assert!(sampler.frequency_for_pixel(199, 200) < 20000.0);

        let range = FrequencyRange::default();
        assert_relative_eq!(range.proportion_of(range.frequency_at(0.37)), 0.37, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_chain_is_zero_db() {
        let chain = MonoChain::new();
        let curve = ResponseSampler::default().sample(&chain, 50, 48000.0);
        assert_eq!(curve.len(), 50);
        assert!(curve.iter().all(|&db| db.abs() < 1e-12));
    }

    #[test]
    fn test_zero_width() {
        let chain = MonoChain::new();
        assert!(ResponseSampler::default().sample(&chain, 0, 48000.0).is_empty());
    }
}
