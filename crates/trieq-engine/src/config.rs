//! Engine configuration
//!
//! Loaded from JSON. Every field has a default, so a partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use trieq_core::{EqError, EqResult, EqSettings, DEFAULT_SAMPLE_RATE};

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample rate (Hz)
    pub sample_rate: f64,
    /// Largest block the host will hand over
    pub max_block_size: usize,
    /// Response curve width in pixels (one sample per column)
    pub curve_width: usize,
    /// Drawable curve height in pixels
    pub curve_height: f64,
    /// Curve poll interval (ms)
    pub poll_interval_ms: u64,
    /// dB shown at the bottom edge
    pub curve_min_db: f64,
    /// dB shown at the top edge
    pub curve_max_db: f64,
    /// Initial control values
    pub settings: Option<EqSettings>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            max_block_size: 512,
            curve_width: 200,
            curve_height: 120.0,
            poll_interval_ms: 16, // ~60 Hz
            curve_min_db: -24.0,
            curve_max_db: 24.0,
            settings: None,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> EqResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EqError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> EqResult<Self> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> EqResult<()> {
        let json =
            serde_json::to_string_pretty(self).map_err(|e| EqError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> EqResult<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(EqError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 {
            return Err(EqError::InvalidBlockSize(0));
        }
        if self.curve_width == 0 {
            return Err(EqError::Config("curve_width must be at least 1".into()));
        }
        if !(self.curve_height.is_finite() && self.curve_height > 0.0) {
            return Err(EqError::Config(format!(
                "curve_height must be positive, got {}",
                self.curve_height
            )));
        }
        if self.poll_interval_ms == 0 {
            return Err(EqError::Config("poll_interval_ms must be at least 1".into()));
        }
        if !(self.curve_min_db < self.curve_max_db) {
            return Err(EqError::Config(format!(
                "curve range [{}, {}] is empty",
                self.curve_min_db, self.curve_max_db
            )));
        }
        if let Some(settings) = &self.settings {
            let nyquist = self.sample_rate / 2.0;
            for (name, freq) in [
                ("low_cut_freq", settings.low_cut_freq),
                ("high_cut_freq", settings.high_cut_freq),
                ("peak_freq", settings.peak_freq),
            ] {
                if freq >= nyquist {
                    log::warn!("{name} {freq} Hz is at or above Nyquist ({nyquist} Hz)");
                }
            }
        }
        Ok(())
    }
}
