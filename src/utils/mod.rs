//! Host DSP primitives and shared helpers

pub mod fixed;
pub mod logging;
pub mod math;
pub mod smoother;

pub use fixed::{f32_to_q31, param_val_to_f32, q31_to_f32, Q31};
pub use logging::init_logger;
pub use math::{clip01, clip_m1_1, clip_min_max, lerp, soft_clip, wrap_phase};
pub use smoother::BlockRamp;
