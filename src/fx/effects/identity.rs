use crate::fx::{Effect, RingHistory, Sample};

/// Pass-through: `y[n] = x[n]`.
#[derive(Default)]
pub struct Identity;

impl Identity {
    pub fn new() -> Self {
        Self
    }
}

impl Effect for Identity {
    fn max_delay(&self) -> usize {
        1
    }

    #[inline]
    fn compute(&mut self, x: &RingHistory, _y: &RingHistory) -> Sample {
        x.get(0)
    }
}
