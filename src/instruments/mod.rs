pub mod chord;
pub mod drum808;

pub use self::chord::*;
pub use self::drum808::*;

use crate::host::HostConfig;
use crate::utils::Q31;

/// Per-block oscillator context delivered by the host
///
/// Layout matches the host's `user_osc_param_t`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UserOscParams {
    /// Shape LFO value (Q31)
    pub shape_lfo: i32,
    /// Note in the high byte, fine tune (1/255 semitone) in the low byte
    pub pitch: u16,
    /// Filter cutoff (unused by the oscillators here)
    pub cutoff: u16,
    /// Filter resonance (unused by the oscillators here)
    pub resonance: u16,
    pub reserved0: [u16; 3],
}

impl UserOscParams {
    /// Params for a plain note with no fine tune and a centered LFO
    pub fn for_note(note: u8) -> Self {
        Self {
            pitch: (note as u16) << 8,
            ..Self::default()
        }
    }

    /// Params for a note with fine tune
    pub fn for_pitch(note: u8, fine: u8) -> Self {
        Self {
            pitch: ((note as u16) << 8) | fine as u16,
            ..Self::default()
        }
    }
}

/// Oscillator parameter slots
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OscParam {
    Id1,
    Id2,
    Id3,
    Id4,
    Id5,
    Id6,
    /// Shape knob
    Shape,
    /// Shift + shape knob
    ShiftShape,
}

impl OscParam {
    /// Number of parameter slots the host addresses
    pub const COUNT: u16 = 8;

    /// Decode a host parameter index
    pub fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(OscParam::Id1),
            1 => Some(OscParam::Id2),
            2 => Some(OscParam::Id3),
            3 => Some(OscParam::Id4),
            4 => Some(OscParam::Id5),
            5 => Some(OscParam::Id6),
            6 => Some(OscParam::Shape),
            7 => Some(OscParam::ShiftShape),
            _ => None,
        }
    }
}

/// Callback contract every oscillator unit implements
///
/// The host calls these one at a time per instance. `cycle` runs on the
/// audio thread and must not allocate, block or panic.
pub trait OscUnit: Send {
    /// Reset every field of the unit's state
    fn init(&mut self, host: &HostConfig);

    /// Render `out.len()` Q31 frames
    fn cycle(&mut self, params: &UserOscParams, out: &mut [Q31]);

    fn note_on(&mut self, params: &UserOscParams);

    fn note_off(&mut self, params: &UserOscParams);

    /// Apply a panel parameter (raw host value)
    fn param(&mut self, param: OscParam, value: u16);
}
