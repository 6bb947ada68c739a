use crate::fx::effects::common::delay_samples;
use crate::fx::{Effect, RingHistory, Sample};

const FEEDBACK: f64 = 0.7;
const DELAY_SECONDS: f64 = 0.3;

/// Echo built as a feedback loop: `y[n] = norm * (x[n] + a*y[n-N])`.
///
/// `norm = 1 - a^2` sits outside the loop as well, so successive repetitions
/// shrink by `norm*a` per period.
pub struct RecursiveEcho {
    delay: usize,
    max_delay: usize,
    norm: f64,
}

impl RecursiveEcho {
    pub fn new(sample_rate: usize) -> Self {
        let max_delay = sample_rate;

        Self {
            delay: delay_samples(DELAY_SECONDS, sample_rate, max_delay),
            max_delay,
            norm: 1.0 - FEEDBACK * FEEDBACK,
        }
    }

    pub fn delay(&self) -> usize {
        self.delay
    }
}

impl Effect for RecursiveEcho {
    fn max_delay(&self) -> usize {
        self.max_delay
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, y: &RingHistory) -> Sample {
        self.norm * (x.get(0) + FEEDBACK * y.get(self.delay))
    }
}
