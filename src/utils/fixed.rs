//! Fixed-point sample and parameter conversion
//!
//! Oscillator units write signed Q31 samples (`i32`, full scale = 2^31) and
//! receive their shape LFO and mod-fx parameters in the same format. Panel
//! parameters arrive as 10-bit integers (0-1023).

/// Q31 fixed-point sample
pub type Q31 = i32;

/// Full scale of a Q31 value as a float (2^31)
const Q31_SCALE: f32 = 2_147_483_648.0;

/// Reciprocal of the Q31 full scale
const Q31_TO_F32: f32 = 1.0 / Q31_SCALE;

/// Scale from a 10-bit panel value to 0.0-1.0
pub const PARAM_VAL_SCALE: f32 = 1.0 / 1023.0;

/// Convert a Q31 value to a float in [-1.0, 1.0]
#[inline]
pub fn q31_to_f32(q: Q31) -> f32 {
    q as f32 * Q31_TO_F32
}

/// Convert a float to Q31
///
/// Multiplies by 2^31 and truncates toward zero. Values at or beyond full
/// scale saturate to `i32::MAX` / `i32::MIN`; NaN maps to 0.
#[inline]
pub fn f32_to_q31(f: f32) -> Q31 {
    // `as` is saturating for float -> int casts
    (f * Q31_SCALE) as Q31
}

/// Convert a 10-bit panel parameter value to a float
///
/// 0 maps to 0.0 and 1023 maps to 1.0. Larger values (percent or index
/// parameters are not range-checked by the host) scale linearly past 1.0.
#[inline]
pub fn param_val_to_f32(value: u16) -> f32 {
    value as f32 * PARAM_VAL_SCALE
}
