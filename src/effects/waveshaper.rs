//! Waveshaping transfer functions for the distortion mod-fx
//!
//! Four shapes around a fixed ±0.15 window:
//! - soft clip: clamp, then subtract a cubic term
//! - hard clip: clamp
//! - wrap: values leaving one side re-enter from the other (sawtooth-like)
//! - fold: values leaving the window are mirrored back (triangle-like)
//!
//! Wrap and fold are evaluated in closed form so the cost per sample is
//! constant no matter how hard the input is driven.

use super::Effect;
use crate::utils::clip_min_max;

/// Half-width of the shaping window
pub const SHAPER_LIMIT: f32 = 0.15;

/// Cubic amount of the soft clip
pub const SHAPER_SMOOTH: f32 = 0.15;

/// Transfer function selected by the time knob
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistortionKind {
    SoftClip,
    HardClip,
    Wrap,
    Fold,
}

impl DistortionKind {
    /// Quantize a 0-1 knob position into four equal buckets
    pub fn from_knob(valf: f32) -> Self {
        if valf < 0.25 {
            DistortionKind::SoftClip
        } else if valf < 0.5 {
            DistortionKind::HardClip
        } else if valf < 0.75 {
            DistortionKind::Wrap
        } else {
            DistortionKind::Fold
        }
    }

    /// Apply the transfer function with the standard window
    #[inline]
    pub fn shape(self, x: f32) -> f32 {
        match self {
            DistortionKind::SoftClip => soft_clip(x, SHAPER_LIMIT, SHAPER_SMOOTH),
            DistortionKind::HardClip => hard_clip(x, SHAPER_LIMIT),
            DistortionKind::Wrap => wrap(x, SHAPER_LIMIT),
            DistortionKind::Fold => fold(x, SHAPER_LIMIT),
        }
    }
}

/// Clamp to ±lim, then subtract `smooth * x^3`
#[inline]
pub fn soft_clip(x: f32, lim: f32, smooth: f32) -> f32 {
    let out = clip_min_max(-lim, x, lim);
    out - smooth * (out * out * out)
}

/// Clamp to ±lim
#[inline]
pub fn hard_clip(x: f32, lim: f32) -> f32 {
    clip_min_max(-lim, x, lim)
}

/// Wrap into ±lim with a jump at each boundary
///
/// A value `d` past `+lim` comes back in at `-lim + d`, repeatedly, so the
/// result has period `2 * lim`. Landing exactly on a boundary stays there.
/// Non-finite input yields 0.
#[inline]
pub fn wrap(x: f32, lim: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    if x > lim {
        -lim + excess(x - lim, 2.0 * lim)
    } else if x < -lim {
        lim - excess(-x - lim, 2.0 * lim)
    } else {
        x
    }
}

/// Mirror back into ±lim at each boundary
///
/// Continuous everywhere with period `4 * lim`. Non-finite input yields 0.
#[inline]
pub fn fold(x: f32, lim: f32) -> f32 {
    if !x.is_finite() {
        return 0.0;
    }
    if x > lim || x < -lim {
        let period = 4.0 * lim;
        let t = (x + lim).rem_euclid(period);
        if t <= 2.0 * lim {
            t - lim
        } else {
            3.0 * lim - t
        }
    } else {
        x
    }
}

/// Positive overshoot reduced into (0, span]
#[inline]
fn excess(over: f32, span: f32) -> f32 {
    let r = over % span;
    if r <= 0.0 {
        span
    } else {
        r
    }
}

/// Pre-gain followed by one transfer function
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Waveshaper {
    kind: DistortionKind,
    gain: f32,
}

impl Waveshaper {
    /// Create a shaper; `depth` (0-1) sets the pre-gain to `10 * depth + 1`
    pub fn new(kind: DistortionKind, depth: f32) -> Self {
        Self {
            kind,
            gain: depth * 10.0 + 1.0,
        }
    }

    pub fn kind(&self) -> DistortionKind {
        self.kind
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }
}

impl Effect for Waveshaper {
    #[inline]
    fn process(&self, input: f32) -> f32 {
        self.kind.shape(input * self.gain)
    }
}
