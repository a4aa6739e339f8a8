//! trieq-dsp: the real-time filter chain
//!
//! ## Modules
//! - `biquad` - TDF-II biquad sections and their closed-form response
//! - `design` - coefficient designers for the peak and cut stages
//! - `cascade` - cut stage with four slots and the slope activation policy
//! - `chain` - per-channel low-cut → peak → high-cut chain
//! - `response` - composite magnitude sampling for display

pub mod biquad;
pub mod cascade;
pub mod chain;
pub mod design;
pub mod response;

pub use biquad::{BiquadCoeffs, BiquadTDF2};
pub use cascade::{apply_cascade, CutStage};
pub use chain::{ChainPosition, MonoChain};
pub use design::{design_cut_cascade, design_peak, ChainCoefficients, CutCoefficients, CutKind};
pub use response::{FrequencyRange, ResponseSampler};

use trieq_core::Sample;

/// Trait for all DSP processors
pub trait Processor: Send + Sync {
    /// Reset processor state
    fn reset(&mut self);

    /// Get latency in samples
    fn latency(&self) -> usize {
        0
    }
}

/// Mono processor trait
pub trait MonoProcessor: Processor {
    /// Process a single sample
    fn process_sample(&mut self, input: Sample) -> Sample;

    /// Process a block of samples
    fn process_block(&mut self, buffer: &mut [Sample]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }
}
