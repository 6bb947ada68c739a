use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::fx::{FULL_SCALE, Sample};

const PEAK_HOLD_SECONDS: usize = 2;

/// Tracks the output peak on the audio thread and publishes it for the
/// control side.
pub struct PeakMeter {
    current_peak: f64,
    samples_since_peak: usize,
    peak_hold_samples: usize,
    info: Arc<ArcSwap<PeakMeterInfo>>,
}

#[derive(Clone)]
pub struct PeakMeterHandle {
    info: Arc<ArcSwap<PeakMeterInfo>>,
}

#[derive(Debug, Clone, Default)]
pub struct PeakMeterInfo {
    pub peak_db: f64,
    /// Peak relative to full scale; above 1.0 the boundary saturates.
    pub peak_linear: f64,
    pub is_clipping: bool,
}

impl PeakMeter {
    pub fn new(sample_rate: usize) -> (Self, PeakMeterHandle) {
        let info = Arc::new(ArcSwap::from_pointee(PeakMeterInfo::default()));

        (
            Self {
                current_peak: 0.0,
                samples_since_peak: 0,
                peak_hold_samples: sample_rate * PEAK_HOLD_SECONDS,
                info: Arc::clone(&info),
            },
            PeakMeterHandle { info },
        )
    }

    pub fn process(&mut self, samples: &[Sample]) {
        let block_peak = samples.iter().fold(0.0f64, |peak, s| peak.max(s.abs()));
        self.process_peak(block_peak, samples.len());
    }

    /// Feed an already reduced block: its absolute peak in core units and
    /// how many frames it spanned. The hold window counts `frames`.
    pub fn process_peak(&mut self, peak: Sample, frames: usize) {
        let block_peak = peak.abs() / FULL_SCALE;

        if block_peak > self.current_peak {
            self.current_peak = block_peak;
            self.samples_since_peak = 0;
        } else {
            self.samples_since_peak += frames;

            if self.samples_since_peak > self.peak_hold_samples {
                self.current_peak = block_peak;
                self.samples_since_peak = 0;
            }
        }

        let peak_db = if self.current_peak > 1e-10 {
            20.0 * self.current_peak.log10()
        } else {
            -100.0
        };

        self.info.store(Arc::new(PeakMeterInfo {
            peak_db,
            peak_linear: self.current_peak,
            is_clipping: self.current_peak >= 1.0,
        }));
    }

    pub fn reset(&mut self) {
        self.current_peak = 0.0;
        self.samples_since_peak = 0;
        self.info.store(Arc::new(PeakMeterInfo::default()));
    }
}

impl PeakMeterHandle {
    pub fn get_info(&self) -> PeakMeterInfo {
        self.info.load().as_ref().clone()
    }
}
