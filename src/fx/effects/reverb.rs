use crate::fx::effects::common::delay_samples;
use crate::fx::{Effect, RingHistory, Sample};

const FEEDBACK: f64 = 0.8;
const NORM: f64 = 0.5;
const DELAY_SECONDS: f64 = 0.02;

/// First-order allpass over a 20 ms delay line.
///
/// `y[n] = norm * (-x[n] + x[n-N] + a*y[n-N])`
pub struct Reverb {
    delay: usize,
    max_delay: usize,
}

impl Reverb {
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

impl Effect for Reverb {
    fn max_delay(&self) -> usize {
        self.max_delay
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, y: &RingHistory) -> Sample {
        NORM * (-x.get(0) + x.get(self.delay) + FEEDBACK * y.get(self.delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::effects::test_util::{SAMPLE_RATE, assert_close, impulse, run};

    #[test]
    fn delay_is_twenty_milliseconds() {
        assert_eq!(Reverb::new(SAMPLE_RATE).delay(), 320);
        assert_eq!(Reverb::new(44_100).delay(), 882);
    }

    #[test]
    fn impulse_response() {
        let reverb = Reverb::new(SAMPLE_RATE);
        let n = reverb.delay();
        let output = run(reverb, &impulse(3 * n + 1));

        assert_close(output[0], -0.5, 1e-12);
        assert_close(output[n], NORM * (1.0 - FEEDBACK * 0.5), 1e-12);
        assert_close(output[2 * n], NORM * FEEDBACK * output[n], 1e-12);
        assert_close(output[3 * n], NORM * FEEDBACK * output[2 * n], 1e-12);
        assert!(output[1..n].iter().all(|&s| s == 0.0));
    }
}
