use crate::fx::effects::common::delay_samples;
use crate::fx::{Effect, RingHistory, Sample};

const FEEDBACK: f64 = 0.8;
const LEAK: f64 = 0.7;
const DELAY_SECONDS: f64 = 0.3;

/// Feedback echo whose loop runs through a leaky integrator, so every
/// repetition comes back duller than the last.
///
/// `y[n] = x[n] - l*x[n-1] + l*y[n-1] + a*(1-l)*y[n-N]`
pub struct NaturalEcho {
    delay: usize,
    max_delay: usize,
}

impl NaturalEcho {
    pub fn new(sample_rate: usize) -> Self {
        let max_delay = sample_rate;

        Self {
            delay: delay_samples(DELAY_SECONDS, sample_rate, max_delay),
            max_delay,
        }
    }

    pub fn delay(&self) -> usize {
        self.delay
    }
}

impl Effect for NaturalEcho {
    fn max_delay(&self) -> usize {
        self.max_delay
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, y: &RingHistory) -> Sample {
        x.get(0) - LEAK * x.get(1)
            + LEAK * y.get(1)
            + FEEDBACK * (1.0 - LEAK) * y.get(self.delay)
    }
}
