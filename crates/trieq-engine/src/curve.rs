//! Response curve: the visualization side of the parameter bridge
//!
//! A poller checks the store's change flag on a fixed tick and only then
//! redesigns its own chain and resamples the curve. That chain never sees
//! audio and shares nothing with the processor but the parameter store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, select, tick, Sender};
use parking_lot::{Mutex, RwLock};

use trieq_core::{AtomicParam, EqParameters, EqResult, EqSettings};
use trieq_dsp::{ChainCoefficients, MonoChain, ResponseSampler};

use crate::config::EngineConfig;

// ============ Curve Mapping ============

/// Affine map from dB to a vertical pixel position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveMapping {
    pub min_db: f64,
    pub max_db: f64,
    pub height: f64,
}

impl CurveMapping {
    pub fn new(min_db: f64, max_db: f64, height: f64) -> Self {
        Self {
            min_db,
            max_db,
            height,
        }
    }

    /// `max_db` maps to 0 (top edge), `min_db` to `height`; no clamping
    #[inline]
    pub fn db_to_y(&self, db: f64) -> f64 {
        self.height - (db - self.min_db) / (self.max_db - self.min_db) * self.height
    }

    #[inline]
    pub fn y_to_db(&self, y: f64) -> f64 {
        self.min_db + (self.height - y) / self.height * (self.max_db - self.min_db)
    }

    /// Polyline with one point per column
    pub fn to_points(&self, magnitudes: &[f64]) -> Vec<(f64, f64)> {
        magnitudes
            .iter()
            .enumerate()
            .map(|(x, &db)| (x as f64, self.db_to_y(db)))
            .collect()
    }
}

impl Default for CurveMapping {
    fn default() -> Self {
        Self::new(-24.0, 24.0, 120.0)
    }
}

// ============ Response Curve ============

/// Isolated chain plus the last sampled magnitudes
#[derive(Debug, Clone)]
pub struct ResponseCurve {
    chain: MonoChain,
    sampler: ResponseSampler,
    width: usize,
    magnitudes: Vec<f64>,
}

impl ResponseCurve {
    pub fn new(width: usize) -> Self {
        Self {
            chain: MonoChain::new(),
            sampler: ResponseSampler::default(),
            width,
            magnitudes: vec![0.0; width],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn set_width(&mut self, width: usize) {
        self.width = width;
        self.magnitudes.resize(width, 0.0);
    }

    /// Redesign the display chain and resample every column
    ///
    /// Frequencies are clamped below Nyquist the same way the audio path does.
    pub fn refresh(&mut self, settings: &EqSettings, sample_rate: f64) {
        let settings = settings.clamped(sample_rate);
        self.chain
            .apply(&ChainCoefficients::design(&settings, sample_rate));
        self.sampler
            .sample_into(&self.chain, sample_rate, &mut self.magnitudes);
    }

    /// dB per column from the last refresh
    #[inline]
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    #[inline]
    pub fn chain(&self) -> &MonoChain {
        &self.chain
    }
}

/// Published result of one recompute
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSnapshot {
    /// Bumped on every recompute; 0 means nothing drawn yet
    pub revision: u64,
    pub settings: EqSettings,
    pub magnitudes: Vec<f64>,
}

// ============ Poller ============

struct PollerShared {
    params: Arc<EqParameters>,
    sample_rate: AtomicParam,
    curve: Mutex<ResponseCurve>,
    latest: RwLock<CurveSnapshot>,
    revision: AtomicU64,
}

impl PollerShared {
    fn poll(&self) -> bool {
        if !self.params.take_changed() {
            return false;
        }

        let settings = self.params.settings();
        let mut curve = self.curve.lock();
        curve.refresh(&settings, self.sample_rate.get());

        let revision = self.revision.fetch_add(1, Ordering::Relaxed) + 1;
        let mut latest = self.latest.write();
        if latest.revision > 0
            && (latest.settings.low_cut_slope != settings.low_cut_slope
                || latest.settings.high_cut_slope != settings.high_cut_slope)
        {
            log::debug!(
                "Cut slopes now {} / {}",
                settings.low_cut_slope.label(),
                settings.high_cut_slope.label()
            );
        }
        *latest = CurveSnapshot {
            revision,
            settings,
            magnitudes: curve.magnitudes().to_vec(),
        };
        true
    }
}

/// Periodic "recompute only when something changed" task
pub struct CurvePoller {
    shared: Arc<PollerShared>,
    interval: Duration,
    stop_tx: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl CurvePoller {
    pub fn new(params: Arc<EqParameters>, sample_rate: f64, width: usize, interval: Duration) -> Self {
        Self {
            shared: Arc::new(PollerShared {
                params,
                sample_rate: AtomicParam::new(sample_rate),
                curve: Mutex::new(ResponseCurve::new(width)),
                latest: RwLock::new(CurveSnapshot::default()),
                revision: AtomicU64::new(0),
            }),
            interval,
            stop_tx: None,
            thread: None,
        }
    }

    pub fn from_config(params: Arc<EqParameters>, config: &EngineConfig) -> Self {
        Self::new(
            params,
            config.sample_rate,
            config.curve_width,
            Duration::from_millis(config.poll_interval_ms),
        )
    }

    /// Change the rate used for the display chain and force a redraw
    pub fn set_sample_rate(&self, sample_rate: f64) {
        self.shared.sample_rate.set(sample_rate);
        self.shared.params.mark_changed();
    }

    /// Resize the curve and force a redraw
    pub fn set_width(&self, width: usize) {
        self.shared.curve.lock().set_width(width);
        self.shared.params.mark_changed();
    }

    /// Run one check; true when the curve was recomputed
    pub fn poll_once(&self) -> bool {
        self.shared.poll()
    }

    /// Last published curve
    pub fn latest(&self) -> CurveSnapshot {
        self.shared.latest.read().clone()
    }

    pub fn revision(&self) -> u64 {
        self.shared.revision.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.thread.is_some()
    }

    /// Start the polling thread; the first tick always recomputes
    pub fn start(&mut self) -> EqResult<()> {
        if self.thread.is_some() {
            return Ok(());
        }

        self.shared.params.mark_changed();

        let shared = self.shared.clone();
        let ticker = tick(self.interval);
        let (stop_tx, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("trieq-curve".into())
            .spawn(move || {
                loop {
                    select! {
                        recv(ticker) -> _ => {
                            if shared.poll() {
                                log::trace!("Response curve recomputed");
                            }
                        }
                        recv(stop_rx) -> _ => break,
                    }
                }
                log::info!("Curve poller exiting");
            })?;

        self.stop_tx = Some(stop_tx);
        self.thread = Some(handle);
        log::info!("Curve poller started ({:?} interval)", self.interval);
        Ok(())
    }

    /// Stop and join the polling thread
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::error!("Curve poller thread panicked");
            }
        }
    }
}

impl Drop for CurvePoller {
    fn drop(&mut self) {
        self.stop();
    }
}
