use std::f64::consts::PI;

use crate::fx::effects::common::{Lfo, conjugate_pair};
use crate::fx::{Effect, RingHistory, Sample};

const POLE_DELTA: f64 = 0.3 * PI;
const LFO_HZ: f64 = 3.0;
const POLE_MAGNITUDE: f64 = 0.99;
const POLE_PHASE: f64 = 0.04 * PI;
const ZERO_MAGNITUDE: f64 = 0.9;
const ZERO_PHASE: f64 = 0.06 * PI;
const NORM: f64 = 0.3;

/// Auto-wah: a 3 Hz oscillator sweeps the pole and zero angles of a
/// second-order filter, giving a moving band-pass.
///
/// Per sample the sweep offset is `d = delta * (1 + cos(ω)) / 2`, then `ω`
/// advances and `b1`, `a1` are recomputed at `phase + d`. The squared
/// magnitudes `b2`, `a2` never change.
pub struct Wah {
    lfo: Lfo,
    b2: f64,
    a2: f64,
}

impl Wah {
    pub fn new(sample_rate: usize) -> Self {
        let (_, b2) = conjugate_pair(ZERO_MAGNITUDE, ZERO_PHASE);
        let (_, a2) = conjugate_pair(POLE_MAGNITUDE, POLE_PHASE);

        Self {
            lfo: Lfo::new(LFO_HZ, sample_rate),
            b2,
            a2,
        }
    }

    /// Sweep offset for the current oscillator phase.
    fn sweep(&self) -> f64 {
        POLE_DELTA * (1.0 + self.lfo.phase().cos()) / 2.0
    }
}

impl Effect for Wah {
    fn max_delay(&self) -> usize {
        2
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, y: &RingHistory) -> Sample {
        let d = self.sweep();
        self.lfo.advance();

        let (b1, _) = conjugate_pair(ZERO_MAGNITUDE, ZERO_PHASE + d);
        let (a1, _) = conjugate_pair(POLE_MAGNITUDE, POLE_PHASE + d);

        NORM * (x.get(0) + b1 * x.get(1) + self.b2 * x.get(2)
            - a1 * y.get(1)
            - self.a2 * y.get(2))
    }
}
