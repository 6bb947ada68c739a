use crate::fx::effects::common::delay_samples;
use crate::fx::{Effect, RingHistory, Sample};

const DIRECT_GAIN: f64 = 1.0;
const FIRST_TAP_GAIN: f64 = 0.7;
const SECOND_TAP_GAIN: f64 = 0.5;
const TAP_SPACING_SECONDS: f64 = 0.3;

/// Feed-forward echo with two repetitions 0.3 s apart.
///
/// `y[n] = norm * (a*x[n] + b*x[n-N] + c*x[n-2N])` with
/// `norm = 1 / (a + b + c)`.
pub struct Echo {
    spacing: usize,
    max_delay: usize,
    norm: f64,
}

impl Echo {
    pub fn new(sample_rate: usize) -> Self {
        // Both taps must fit, even at degenerate rates.
        let max_delay = sample_rate.max(2);

        Self {
            spacing: delay_samples(TAP_SPACING_SECONDS, sample_rate, max_delay / 2),
            max_delay,
            norm: 1.0 / (DIRECT_GAIN + FIRST_TAP_GAIN + SECOND_TAP_GAIN),
        }
    }

    pub fn spacing(&self) -> usize {
        self.spacing
    }
}

impl Effect for Echo {
    fn max_delay(&self) -> usize {
        self.max_delay
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, _y: &RingHistory) -> Sample {
        self.norm
            * (DIRECT_GAIN * x.get(0)
                + FIRST_TAP_GAIN * x.get(self.spacing)
                + SECOND_TAP_GAIN * x.get(2 * self.spacing))
    }
}
