//! User units for logue-style synthesizer hosts
//!
//! Three units, each exposed to the host through a C ABI in [`ffi`]:
//! - a twelve-voice chord oscillator
//! - an 808-style drum oscillator with a pitch glide and phase distortion
//! - a distortion mod-fx with soft clip, hard clip, wrap and fold shapers

pub mod effects;
pub mod ffi;
pub mod gen;
pub mod host;
pub mod instruments;
pub mod manifest;
pub mod utils;

// Offline WAV rendering
#[cfg(feature = "bounce")]
pub mod bounce;

pub use effects::{DistortionFx, ModFxUnit};
pub use host::HostConfig;
pub use instruments::{ChordOscillator, Drum808, OscUnit, UserOscParams};
