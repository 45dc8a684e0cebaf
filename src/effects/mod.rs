pub mod distortion;
pub mod waveshaper;

pub use self::distortion::*;
pub use self::waveshaper::*;

use crate::host::HostConfig;

/// Stateless per-sample processor
pub trait Effect: Send {
    /// Process a single audio sample through the effect
    fn process(&self, input: f32) -> f32;
}

/// Mod-fx parameter slots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModFxParam {
    /// Time knob
    Time,
    /// Depth knob
    Depth,
}

impl ModFxParam {
    /// Number of parameter slots the host addresses
    pub const COUNT: u8 = 2;

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(ModFxParam::Time),
            1 => Some(ModFxParam::Depth),
            _ => None,
        }
    }
}

/// Callback contract every mod-fx unit implements
///
/// Buffers hold interleaved stereo frames (`2 * frames` floats). The sub
/// bus is only present on hosts with a sub timbre. A block is one
/// `begin_block` followed by one bus call per bus.
pub trait ModFxUnit: Send {
    /// Reset every field of the unit's state
    fn init(&mut self, host: &HostConfig);

    /// Latch per-block host state (tempo) before the buses are processed
    fn begin_block(&mut self);

    /// Process one bus from `input` into `output`
    fn process_bus(&self, input: &[f32], output: &mut [f32]);

    /// Process one bus whose input and output share a buffer
    fn process_bus_in_place(&self, buffer: &mut [f32]);

    /// Apply a knob value (Q31, 0-1 full scale)
    fn param(&mut self, param: ModFxParam, value: i32);

    /// Tempo reported by the host
    fn set_tempo(&mut self, tempo_bpm: f32);

    /// Process one block of the main bus and, if present, the sub bus
    fn process(&mut self, main_in: &[f32], main_out: &mut [f32], sub: Option<(&[f32], &mut [f32])>) {
        self.begin_block();
        self.process_bus(main_in, main_out);
        if let Some((sub_in, sub_out)) = sub {
            self.process_bus(sub_in, sub_out);
        }
    }
}
