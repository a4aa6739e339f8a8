//! Filter chain property tests
//!
//! Verifies:
//! - Section counts and slot activation per slope
//! - Silence in, silence out
//! - Flat peak at 0 dB gain
//! - Cut roll-off depth one decade below/above the cutoff
//! - Slope round trips restore the original response
//! - Processed audio matches the sampled magnitude response

use std::f64::consts::PI;

use approx::assert_relative_eq;
use trieq_core::{is_finite_block, EqSettings, Slope};
use trieq_dsp::design::{design_high_cut, design_low_cut};
use trieq_dsp::{ChainCoefficients, MonoChain, ResponseSampler};

const SAMPLE_RATE: f64 = 44100.0;
const BLOCK_SIZE: usize = 256;

/// Generate test sine wave
fn generate_sine(samples: usize, freq: f64) -> Vec<f64> {
    (0..samples)
        .map(|i| (2.0 * PI * freq * i as f64 / SAMPLE_RATE).sin())
        .collect()
}

/// Calculate RMS of signal
fn rms(signal: &[f64]) -> f64 {
    let sum: f64 = signal.iter().map(|x| x * x).sum();
    (sum / signal.len() as f64).sqrt()
}

fn prepared_chain(settings: &EqSettings) -> MonoChain {
    let mut chain = MonoChain::new();
    chain.prepare(SAMPLE_RATE, BLOCK_SIZE).unwrap();
    chain.apply(&ChainCoefficients::design(settings, SAMPLE_RATE));
    chain
}

fn all_configurations() -> Vec<EqSettings> {
    let mut out = Vec::new();
    for low in Slope::ALL {
        for high in Slope::ALL {
            for &gain in &[-24.0, 0.0, 24.0] {
                out.push(EqSettings {
                    low_cut_freq: 80.0,
                    high_cut_freq: 12000.0,
                    peak_freq: 1500.0,
                    peak_gain_db: gain,
                    peak_q: 0.5,
                    low_cut_slope: low,
                    high_cut_slope: high,
                });
            }
        }
    }
    out
}

#[test]
fn test_section_and_slot_counts() {
    for settings in all_configurations() {
        let low = design_low_cut(&settings, SAMPLE_RATE);
        let high = design_high_cut(&settings, SAMPLE_RATE);
        assert_eq!(low.len() * 12, settings.low_cut_slope.db_per_octave() as usize);
        assert_eq!(high.len() * 12, settings.high_cut_slope.db_per_octave() as usize);

        let chain = prepared_chain(&settings);
        assert_eq!(chain.low_cut().active_count(), low.len());
        assert_eq!(chain.high_cut().active_count(), high.len());
        assert!(chain.low_cut().is_active(0));
        assert!(chain.high_cut().is_active(0));
    }
}

#[test]
fn test_silence_stays_silent() {
    for settings in all_configurations() {
        let mut chain = prepared_chain(&settings);
        let mut buffer = vec![0.0; BLOCK_SIZE];
        for _ in 0..8 {
            chain.process(&mut buffer);
        }
        assert!(buffer.iter().all(|s| s.abs() < 1e-15));
    }
}

#[test]
fn test_zero_gain_peak_is_unity_for_any_q() {
    for &q in &[0.1, 0.7, 1.0, 3.3, 10.0] {
        let settings = EqSettings {
            peak_freq: 1000.0,
            peak_gain_db: 0.0,
            peak_q: q,
            ..Default::default()
        };
        let coeffs = ChainCoefficients::design(&settings, SAMPLE_RATE);
        for &freq in &[20.0, 200.0, 1000.0, 5000.0, 20000.0] {
            assert_relative_eq!(coeffs.peak.magnitude(freq, SAMPLE_RATE), 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn test_cut_rolloff_reaches_slope() {
    for slope in Slope::ALL {
        let settings = EqSettings {
            low_cut_freq: 1000.0,
            high_cut_freq: 1000.0,
            low_cut_slope: slope,
            high_cut_slope: slope,
            ..Default::default()
        };
        let chain = prepared_chain(&settings);

        let low_db = 20.0 * chain.low_cut().magnitude(100.0, SAMPLE_RATE).log10();
        assert!(
            low_db <= -slope.db_per_octave() * 10.0_f64.log10() + 0.1,
            "{:?}: {low_db} dB at f0/10",
            slope
        );
        // A Butterworth of order n falls ~20·n dB per decade
        assert!(low_db < -(slope.order() as f64) * 20.0 + 1.0);

        let high_db = 20.0 * chain.high_cut().magnitude(10000.0, SAMPLE_RATE).log10();
        assert!(high_db < -slope.db_per_octave(), "{:?}: {high_db} dB at 10·f0", slope);
    }
}

#[test]
fn test_slope_round_trip_restores_response() {
    let base = EqSettings {
        low_cut_freq: 150.0,
        high_cut_freq: 8000.0,
        peak_freq: 900.0,
        peak_gain_db: -4.5,
        peak_q: 2.0,
        low_cut_slope: Slope::Db12,
        high_cut_slope: Slope::Db12,
    };
    let sampler = ResponseSampler::default();

    let mut chain = prepared_chain(&base);
    let original = sampler.sample(&chain, 300, SAMPLE_RATE);

    let steep = EqSettings {
        low_cut_slope: Slope::Db48,
        high_cut_slope: Slope::Db48,
        ..base
    };
    chain.apply(&ChainCoefficients::design(&steep, SAMPLE_RATE));
    let steep_curve = sampler.sample(&chain, 300, SAMPLE_RATE);
    assert_ne!(steep_curve, original);

    chain.apply(&ChainCoefficients::design(&base, SAMPLE_RATE));
    assert_eq!(sampler.sample(&chain, 300, SAMPLE_RATE), original);
}

#[test]
fn test_processed_level_matches_response() {
    let settings = EqSettings {
        low_cut_freq: 100.0,
        high_cut_freq: 10000.0,
        peak_freq: 1000.0,
        peak_gain_db: 6.0,
        peak_q: 1.0,
        low_cut_slope: Slope::Db24,
        high_cut_slope: Slope::Db12,
    };

    for &freq in &[50.0, 1000.0, 15000.0] {
        let mut chain = prepared_chain(&settings);
        let mut signal = generate_sine(SAMPLE_RATE as usize, freq);
        for block in signal.chunks_mut(BLOCK_SIZE) {
            chain.process(block);
        }
        assert!(is_finite_block(&signal));

        // Skip the first half second of settling
        let tail = &signal[signal.len() / 2..];
        let measured = rms(tail) / std::f64::consts::FRAC_1_SQRT_2;
        let expected = chain.magnitude(freq, SAMPLE_RATE);
        assert_relative_eq!(measured, expected, max_relative = 0.02);
    }
}

#[test]
fn test_left_and_right_chains_are_independent() {
    let settings = EqSettings {
        peak_gain_db: 12.0,
        ..Default::default()
    };
    let mut left = prepared_chain(&settings);
    let mut right = prepared_chain(&settings);

    let mut loud = generate_sine(BLOCK_SIZE, 750.0);
    left.process(&mut loud);

    // Right chain never saw audio, so silence stays exactly silent
    let mut quiet = vec![0.0; BLOCK_SIZE];
    right.process(&mut quiet);
    assert!(quiet.iter().all(|&s| s == 0.0));
}
