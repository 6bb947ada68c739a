use crate::fx::effects::common::Lfo;
use crate::fx::{Effect, RingHistory, Sample};

const DEPTH: f64 = 0.9;
const LFO_HZ: f64 = 5.0;

/// Amplitude modulation by a 5 Hz raised cosine.
///
/// `y[n] = ((1 - depth) + depth * (1 + cos(ω)) / 2) * x[n]`, with `ω`
/// advanced before each sample.
pub struct Tremolo {
    lfo: Lfo,
}

impl Tremolo {
    pub fn new(sample_rate: usize) -> Self {
        Self {
            lfo: Lfo::new(LFO_HZ, sample_rate),
        }
    }
}

impl Effect for Tremolo {
    fn max_delay(&self) -> usize {
        1
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, _y: &RingHistory) -> Sample {
        self.lfo.advance();
        let gain = (1.0 - DEPTH) + DEPTH * 0.5 * (1.0 + self.lfo.phase().cos());
        gain * x.get(0)
    }
}
