//! Scalar helpers shared by the render loops
//!
//! These mirror the host's DSP primitive library, so their edge-case
//! behavior is part of each unit's observable output.

/// Clamp `x` to [min, max]
#[inline]
pub fn clip_min_max(min: f32, x: f32, max: f32) -> f32 {
    if x > max {
        max
    } else if x < min {
        min
    } else {
        x
    }
}

/// Clamp to [0.0, 1.0]
#[inline]
pub fn clip01(x: f32) -> f32 {
    clip_min_max(0.0, x, 1.0)
}

/// Clamp to [-1.0, 1.0]
#[inline]
pub fn clip_m1_1(x: f32) -> f32 {
    clip_min_max(-1.0, x, 1.0)
}

/// Linear interpolation: `x0` at `fr == 0`, `x1` at `fr == 1`
#[inline]
pub fn lerp(fr: f32, x0: f32, x1: f32) -> f32 {
    x0 + fr * (x1 - x0)
}

/// Wrap a non-negative phase back into [0.0, 1.0)
///
/// Drops the integer part the way the render loops always have (truncation),
/// so it is only a true modulo for `x >= 0`.
#[inline]
pub fn wrap_phase(x: f32) -> f32 {
    let wrapped = x - x.trunc();
    // Rounding can land exactly on 1.0 for values just below an integer
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Cubic soft clip with a hard ceiling at ±1
///
/// `x` is clamped to [-1, 1] first, then `c * x^3` is subtracted.
#[inline]
pub fn soft_clip(c: f32, x: f32) -> f32 {
    let x = clip_m1_1(x);
    x - c * (x * x * x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clips() {
        assert_eq!(clip01(-0.5), 0.0);
        assert_eq!(clip01(1.5), 1.0);
        assert_eq!(clip01(0.25), 0.25);
        assert_eq!(clip_m1_1(-2.0), -1.0);
        assert_eq!(clip_min_max(-0.15, 0.2, 0.15), 0.15);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.0, 2.0, 4.0), 2.0);
        assert_eq!(lerp(1.0, 2.0, 4.0), 4.0);
        assert_eq!(lerp(0.5, 2.0, 4.0), 3.0);
    }

    #[test]
    fn test_wrap_phase() {
        assert_eq!(wrap_phase(0.25), 0.25);
        assert_eq!(wrap_phase(1.25), 0.25);
        assert_eq!(wrap_phase(1.0), 0.0);
        let w = wrap_phase(0.999_999_9 + 0.000_000_1);
        assert!((0.0..1.0).contains(&w));
    }

    #[test]
    fn test_soft_clip_ceiling() {
        // Beyond ±1 the output is pinned to ±(1 - c)
        assert!((soft_clip(0.05, 5.0) - 0.95).abs() < 1e-6);
        assert!((soft_clip(0.05, -5.0) + 0.95).abs() < 1e-6);
        assert!((soft_clip(0.05, 0.5) - (0.5 - 0.05 * 0.125)).abs() < 1e-6);
    }
}
