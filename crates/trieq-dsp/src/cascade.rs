//! Cut stage: four biquad slots and the slope activation policy
//!
//! A slope of 12·N dB/oct keeps slots `0..N` active. The remaining slots
//! are skipped by `process`, so they neither touch the signal nor advance
//! their feedback memory.

use trieq_core::{Sample, Slope, MAX_CUT_STAGES};

use crate::biquad::{BiquadCoeffs, BiquadTDF2};
use crate::design::CutCoefficients;
use crate::{MonoProcessor, Processor};

/// Variable-order cut section
#[derive(Debug, Clone, Default)]
pub struct CutStage {
    slots: [BiquadTDF2; MAX_CUT_STAGES],
    active: usize,
}

impl CutStage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leading slots currently processing audio
    #[inline]
    pub fn active_count(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn is_active(&self, slot: usize) -> bool {
        slot < self.active
    }

    /// Mark every slot bypassed
    pub fn bypass_all(&mut self) {
        self.active = 0;
    }

    /// Activate the first `count` slots, bypassing the rest
    pub fn set_active_count(&mut self, count: usize) {
        self.active = count.min(MAX_CUT_STAGES);
    }

    /// Swap one slot's coefficients; out-of-range slots are ignored
    pub fn set_slot(&mut self, slot: usize, coeffs: BiquadCoeffs) {
        debug_assert!(slot < MAX_CUT_STAGES, "cut stage slot {slot} out of range");
        if let Some(filter) = self.slots.get_mut(slot) {
            filter.set_coeffs(coeffs);
        }
    }

    #[inline]
    pub fn slot(&self, slot: usize) -> Option<&BiquadTDF2> {
        self.slots.get(slot)
    }

    /// Coefficients of the active slots, in processing order
    pub fn active_coeffs(&self) -> impl Iterator<Item = &BiquadCoeffs> {
        self.slots[..self.active].iter().map(|f| f.coeffs())
    }

    /// Product of the active slots' magnitudes at `freq`
    pub fn magnitude(&self, freq: f64, sample_rate: f64) -> f64 {
        self.active_coeffs()
            .map(|c| c.magnitude(freq, sample_rate))
            .product()
    }

    /// Run the active slots over the block in place
    #[inline]
    pub fn process(&mut self, buffer: &mut [Sample]) {
        for filter in &mut self.slots[..self.active] {
            filter.process_block(buffer);
        }
    }
}

impl Processor for CutStage {
    fn reset(&mut self) {
        for filter in &mut self.slots {
            filter.reset();
        }
    }
}

/// Bypass every slot, then load and activate slots `0..=slope.index()`.
///
/// Slot `i` always receives `coeffs[i]`. If fewer sections were designed
/// than the slope asks for, activation stops at the last one available.
pub fn apply_cascade(stage: &mut CutStage, coeffs: &CutCoefficients, slope: Slope) {
    stage.bypass_all();
    for slot in 0..=slope.index() {
        let Some(section) = coeffs.get(slot) else {
            break;
        };
        stage.set_slot(slot, *section);
        stage.set_active_count(slot + 1);
    }
}
