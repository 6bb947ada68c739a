use std::f64::consts::TAU;

/// Number of whole samples in `seconds`, clamped into `[1, max_delay]`.
#[inline]
pub fn delay_samples(seconds: f64, sample_rate: usize, max_delay: usize) -> usize {
    let samples = (seconds * sample_rate as f64).round() as usize;
    samples.clamp(1, max_delay.max(1))
}

/// Second-order polynomial coefficients for a conjugate root pair.
///
/// A root at `magnitude * e^(±j*phase)` expands to
/// `1 + c1 z^-1 + c2 z^-2` with `c1 = -2 * magnitude * cos(phase)` and
/// `c2 = magnitude^2`. Used for both the pole and the zero of a biquad.
#[inline]
pub fn conjugate_pair(magnitude: f64, phase: f64) -> (f64, f64) {
    (-2.0 * magnitude * phase.cos(), magnitude * magnitude)
}

/// Phase accumulator for a low-frequency oscillator.
///
/// The phase is wrapped into `[0, 2π)` on every step so it never loses
/// precision, however long the session runs.
#[derive(Debug, Clone)]
pub struct Lfo {
    phase: f64,
    increment: f64,
}

impl Lfo {
    pub fn new(frequency_hz: f64, sample_rate: usize) -> Self {
        Self {
            phase: 0.0,
            increment: frequency_hz * TAU / sample_rate as f64,
        }
    }

    pub const fn phase(&self) -> f64 {
        self.phase
    }

    pub const fn increment(&self) -> f64 {
        self.increment
    }

    #[inline]
    pub fn advance(&mut self) {
        self.phase = (self.phase + self.increment).rem_euclid(TAU);
    }
}
