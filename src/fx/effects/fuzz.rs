use crate::fx::{Effect, FULL_SCALE, RingHistory, Sample};

const THRESHOLD: f64 = 0.005;
const GAIN: f64 = 5.0;

/// Hard clipper: `y[n] = G * clamp(x[n], -limit, limit)`.
///
/// The limit is a fraction of 32-bit full scale, so the output never exceeds
/// `G * limit` however hot the input is.
pub struct Fuzz {
    limit: f64,
}

impl Fuzz {
    pub fn new() -> Self {
        Self {
            limit: FULL_SCALE * THRESHOLD,
        }
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }
}

impl Default for Fuzz {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Fuzz {
    fn max_delay(&self) -> usize {
        1
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, _y: &RingHistory) -> Sample {
        GAIN * x.get(0).clamp(-self.limit, self.limit)
    }
}
