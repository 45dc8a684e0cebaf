pub mod pitch;
pub mod waveform;

pub use self::pitch::*;
pub use self::waveform::*;
