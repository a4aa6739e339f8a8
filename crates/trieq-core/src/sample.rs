//! Sample type shared by every processing stage

/// Type alias for audio samples (always f64 for maximum precision)
pub type Sample = f64;

/// Returns true when every sample is finite
#[inline]
pub fn is_finite_block(buffer: &[Sample]) -> bool {
    buffer.iter().all(|s| s.is_finite())
}
