//! Parameter ranges and lock-free parameter cells

use portable_atomic::{AtomicF64, Ordering};
use serde::{Deserialize, Serialize};

/// Parameter skew type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParamSkew {
    Linear,
    /// normalized = proportion^exponent; exponents below 1 spread the low end
    Power(f64),
}

/// Parameter range specification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub default: f64,
    /// Legal value interval, 0.0 for continuous
    pub step: f64,
    pub skew: ParamSkew,
}

impl ParamRange {
    pub const fn linear(min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
            skew: ParamSkew::Linear,
        }
    }

    pub const fn skewed(min: f64, max: f64, step: f64, exponent: f64, default: f64) -> Self {
        Self {
            min,
            max,
            default,
            step,
            skew: ParamSkew::Power(exponent),
        }
    }

    /// Denormalize a 0-1 value to actual value
    pub fn denormalize(&self, normalized: f64) -> f64 {
        let proportion = normalized.clamp(0.0, 1.0);
        let proportion = match self.skew {
            ParamSkew::Linear => proportion,
            ParamSkew::Power(exp) if proportion > 0.0 => (proportion.ln() / exp).exp(),
            ParamSkew::Power(_) => 0.0,
        };
        self.min + proportion * (self.max - self.min)
    }

    /// Normalize an actual value to 0-1
    pub fn normalize(&self, value: f64) -> f64 {
        let proportion = ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        match self.skew {
            ParamSkew::Linear => proportion,
            ParamSkew::Power(exp) => proportion.powf(exp),
        }
    }

    /// Quantize to the step grid and clamp into range
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.default;
        }
        let snapped = if self.step > 0.0 {
            self.min + self.step * ((value - self.min) / self.step).round()
        } else {
            value
        };
        snapped.clamp(self.min, self.max)
    }
}

/// Atomic parameter for lock-free access
#[derive(Debug)]
pub struct AtomicParam {
    value: AtomicF64,
}

impl AtomicParam {
    pub fn new(value: f64) -> Self {
        Self {
            value: AtomicF64::new(value),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.store(value, Ordering::Relaxed);
    }
}

impl Default for AtomicParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_skewed_range_round_trip() {
        let range = ParamRange::skewed(20.0, 20000.0, 1.0, 0.25, 750.0);
        for &freq in &[20.0, 100.0, 750.0, 5000.0, 20000.0] {
            let n = range.normalize(freq);
            assert_relative_eq!(range.denormalize(n), freq, max_relative = 1e-9);
        }
        // Quarter skew gives the low decades most of the travel
        assert!(range.normalize(1000.0) > 0.45);
    }

    #[test]
    fn test_snap() {
        let gain = ParamRange::linear(-24.0, 24.0, 0.5, 0.0);
        assert_eq!(gain.snap(3.3), 3.5);
        assert_eq!(gain.snap(100.0), 24.0);
        assert_eq!(gain.snap(f64::NAN), 0.0);

        let q = ParamRange::linear(0.1, 10.0, 0.05, 1.0);
        assert_relative_eq!(q.snap(0.72), 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_atomic_param() {
        let p = AtomicParam::new(1.5);
        assert_eq!(p.get(), 1.5);
        p.set(-3.0);
        assert_eq!(p.get(), -3.0);
    }
}
