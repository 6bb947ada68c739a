use std::f64::consts::PI;

use crate::fx::effects::common::conjugate_pair;
use crate::fx::{Effect, RingHistory, Sample};

const POLE_MAGNITUDE: f64 = 0.98;
const POLE_PHASE: f64 = 0.1 * PI;
const ZERO_MAGNITUDE: f64 = 0.9;
const ZERO_PHASE: f64 = 0.06 * PI;
const NORM: f64 = 0.1;

/// Fixed second-order resonator parametrised by one pole pair and one zero pair.
///
/// `y[n] = norm * (x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2])`
pub struct Biquad {
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    pub fn new() -> Self {
        let (b1, b2) = conjugate_pair(ZERO_MAGNITUDE, ZERO_PHASE);
        let (a1, a2) = conjugate_pair(POLE_MAGNITUDE, POLE_PHASE);

        Self { b1, b2, a1, a2 }
    }

    /// Feed-forward and feedback coefficients as `([1, b1, b2], [a1, a2])`.
    pub fn coefficients(&self) -> ([f64; 3], [f64; 2]) {
        ([1.0, self.b1, self.b2], [self.a1, self.a2])
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Biquad {
    fn max_delay(&self) -> usize {
        2
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, y: &RingHistory) -> Sample {
        NORM * (x.get(0) + self.b1 * x.get(1) + self.b2 * x.get(2)
            - self.a1 * y.get(1)
            - self.a2 * y.get(2))
    }
}
