//! Stereo EQ processor: the audio-thread side of the parameter bridge
//!
//! At the start of every block the processor reads a snapshot from the
//! store, designs coefficients once, and loads them into both channel
//! chains. Parameter changes inside a block take effect at the next one.

use std::sync::Arc;

use trieq_core::{validate_sample_rate, EqError, EqParameters, EqResult, EqSettings, Sample};
use trieq_dsp::{ChainCoefficients, MonoChain, Processor};

/// Two independent chains driven by one parameter store
pub struct EqProcessor {
    params: Arc<EqParameters>,
    left: MonoChain,
    right: MonoChain,
    sample_rate: f64,
    max_block_size: usize,
}

impl EqProcessor {
    pub fn new(params: Arc<EqParameters>) -> Self {
        Self {
            params,
            left: MonoChain::new(),
            right: MonoChain::new(),
            sample_rate: trieq_core::DEFAULT_SAMPLE_RATE,
            max_block_size: 0,
        }
    }

    /// Reset both chains for a stream configuration and load current settings
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> EqResult<()> {
        let sample_rate = validate_sample_rate(sample_rate)?;
        if max_block_size == 0 {
            return Err(EqError::InvalidBlockSize(max_block_size));
        }

        self.left.prepare(sample_rate, max_block_size)?;
        self.right.prepare(sample_rate, max_block_size)?;
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;

        let settings = self.params.settings();
        self.update_filters(&settings);

        log::info!(
            "EqProcessor prepared: {} Hz, block {}",
            sample_rate,
            max_block_size
        );
        Ok(())
    }

    #[inline]
    pub fn params(&self) -> &Arc<EqParameters> {
        &self.params
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
    pub fn left_chain(&self) -> &MonoChain {
        &self.left
    }

    #[inline]
    pub fn right_chain(&self) -> &MonoChain {
        &self.right
    }

    /// Design once, hand the same coefficients to both channels
    pub fn update_filters(&mut self, settings: &EqSettings) {
        let coeffs = self.design(settings);
        self.left.apply(&coeffs);
        self.right.apply(&coeffs);
    }

    // Frequencies above 0.499 * fs would put poles outside the unit circle
    fn design(&self, settings: &EqSettings) -> ChainCoefficients {
        ChainCoefficients::design(&settings.clamped(self.sample_rate), self.sample_rate)
    }

    /// Process one stereo block in place
    pub fn process_block(&mut self, left: &mut [Sample], right: &mut [Sample]) {
        debug_assert_eq!(left.len(), right.len());

        let settings = self.params.settings();
        self.update_filters(&settings);

        self.left.process(left);
        self.right.process(right);
    }

    /// Process a mono block through the left chain
    pub fn process_mono(&mut self, buffer: &mut [Sample]) {
        let coeffs = self.design(&self.params.settings());
        self.left.apply(&coeffs);
        self.left.process(buffer);
    }
}

impl Processor for EqProcessor {
    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}
