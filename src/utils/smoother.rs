//! Per-block linear ramp for control signals
//!
//! The host delivers the shape LFO once per block. Units track the block's
//! target value (`lfo`) and a smoothed value (`lfoz`) that ramps linearly
//! toward it over the block's frames.

/// Linear ramp from the previous block's smoothed value to a new target
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockRamp {
    /// Target value for the current block
    target: f32,
    /// Smoothed value, advanced once per frame
    current: f32,
    /// Per-frame increment for the current block
    step: f32,
}

impl BlockRamp {
    /// Create a settled ramp at `value`
    pub fn new(value: f32) -> Self {
        Self {
            target: value,
            current: value,
            step: 0.0,
        }
    }

    /// Start a new block toward `target`
    ///
    /// With `reset` the ramp jumps straight to the target (no glide).
    /// A zero-frame block leaves the increment at zero.
    #[inline]
    pub fn begin_block(&mut self, target: f32, frames: usize, reset: bool) {
        self.target = target;
        if reset {
            self.current = target;
        }
        self.step = if frames > 0 {
            (target - self.current) / frames as f32
        } else {
            0.0
        };
    }

    /// Advance one frame
    #[inline]
    pub fn tick(&mut self) {
        self.current += self.step;
    }

    /// Target value for the current block
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Current smoothed value
    pub fn get(&self) -> f32 {
        self.current
    }
}
