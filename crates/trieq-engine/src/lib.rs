//! trieq-engine: parameter bridge for the TriEq filter chain
//!
//! Wires the shared parameter store to the two consumers:
//! - `processor` - stereo audio processing, recomputed once per block
//! - `curve` - response curve polling for the display
//! - `config` - engine configuration

pub mod config;
pub mod curve;
pub mod processor;

pub use config::EngineConfig;
pub use curve::{CurveMapping, CurvePoller, CurveSnapshot, ResponseCurve};
pub use processor::EqProcessor;

use std::sync::Arc;

use trieq_core::{EqParameters, EqResult};

/// Store, audio processor and curve poller built from one config
pub struct EqEngine {
    pub params: Arc<EqParameters>,
    pub processor: EqProcessor,
    pub poller: CurvePoller,
    pub mapping: CurveMapping,
}

impl EqEngine {
    /// Build and prepare everything; the poller is created but not started
    pub fn from_config(config: &EngineConfig) -> EqResult<Self> {
        config.validate()?;

        let params = Arc::new(match &config.settings {
            Some(settings) => EqParameters::with_settings(settings),
            None => EqParameters::new(),
        });

        let mut processor = EqProcessor::new(params.clone());
        processor.prepare(config.sample_rate, config.max_block_size)?;

        let poller = CurvePoller::from_config(params.clone(), config);
        let mapping = CurveMapping::new(config.curve_min_db, config.curve_max_db, config.curve_height);

        Ok(Self {
            params,
            processor,
            poller,
            mapping,
        })
    }

    /// Change stream configuration for both the audio and display sides
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> EqResult<()> {
        self.processor.prepare(sample_rate, max_block_size)?;
        self.poller.set_sample_rate(sample_rate);
        Ok(())
    }
}
