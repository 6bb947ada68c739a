//! Conversions between device sample formats and core [`Sample`]s.
//!
//! The core runs in 32-bit full-scale units with no internal clamping
//! (Fuzz aside). Going back out, every conversion saturates: anything past
//! full scale is pinned to the largest representable value and NaN becomes
//! silence.

use crate::fx::{FULL_SCALE, Sample};

#[inline]
pub fn from_i32(sample: i32) -> Sample {
    sample as Sample
}

/// Saturating conversion; `as` casts from float to int clamp and map NaN to 0.
#[inline]
pub fn to_i32(sample: Sample) -> i32 {
    sample.round() as i32
}

#[inline]
pub fn from_f32(sample: f32) -> Sample {
    sample as Sample * FULL_SCALE
}

#[inline]
pub fn to_f32(sample: Sample) -> f32 {
    if sample.is_nan() {
        return 0.0;
    }
    (sample / FULL_SCALE).clamp(-1.0, 1.0) as f32
}

/// Scale a `bits`-wide integer sample up to 32-bit full scale.
#[inline]
pub fn from_int_bits(sample: i32, bits: u16) -> Sample {
    from_i32(sample) * f64::from(1u32 << (32 - bits))
}

/// Scale back down to `bits` wide, saturating at that width.
#[inline]
pub fn to_int_bits(sample: Sample, bits: u16) -> i32 {
    let (scaled, min, max) = scale_to_bits(sample, bits);

    if scaled.is_nan() {
        0
    } else {
        scaled.clamp(min, max) as i32
    }
}

/// Whether [`to_int_bits`] would have to saturate `sample`.
#[inline]
pub fn exceeds_int_bits(sample: Sample, bits: u16) -> bool {
    let (scaled, min, max) = scale_to_bits(sample, bits);
    scaled > max || scaled < min
}

#[inline]
fn scale_to_bits(sample: Sample, bits: u16) -> (f64, f64, f64) {
    let scaled = (sample / f64::from(1u32 << (32 - bits))).round();
    let max = f64::from((1u32 << (bits - 1)) - 1);
    (scaled, -max - 1.0, max)
}

/// Whether `sample` lies beyond what the integer boundary can carry.
#[inline]
pub fn exceeds_full_scale(sample: Sample) -> bool {
    sample > FULL_SCALE || sample < -FULL_SCALE - 1.0
}
