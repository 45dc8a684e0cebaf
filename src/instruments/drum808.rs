//! 808-style drum oscillator
//!
//! A single sine voice whose pitch glides from an attack pitch down to half
//! the played note as the hold time rises from 0 to 1. The glide target is
//! resolved once per block. The sine is phase-distorted by itself, driven and
//! soft-clipped.

use super::{OscParam, OscUnit, UserOscParams};
use crate::gen::{note_to_increment, sine, split_pitch, warm_up};
use crate::host::HostConfig;
use crate::utils::{clip01, f32_to_q31, lerp, param_val_to_f32, q31_to_f32, soft_clip, wrap_phase, BlockRamp, Q31};

/// Cubic amount of the output soft clip
const SOFT_CLIP_AMOUNT: f32 = 0.05;

/// Hold-time rate (per second) at zero pitch decay
const HOLD_RATE: f32 = 20.0;

/// Highest phase-distortion amount reachable from the panel
pub const MAX_DIST: f32 = 0.7;

/// Highest attack pitch multiplier above 1
const ATTACK_PITCH_RANGE: f32 = 24.0;

const FLAGS_NONE: u8 = 0;
const FLAG_RESET: u8 = 1 << 0;

/// Where the pitch glide is
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlidePhase {
    /// Hold time still rising; pitch moving toward the target
    Attack,
    /// Hold time saturated; pitch resting at the target
    Sustain,
}

/// Warp a phase by its own sine and fold the result back toward [0, 1)
///
/// Non-positive results are reflected as `1 - p` rather than wrapped, which
/// only lands inside one cycle for small excursions. The sine evaluator
/// wraps whatever comes out.
#[inline]
pub fn warp_phase(phase: f32, dist: f32) -> f32 {
    let p = phase + lerp(dist, 0.0, dist * sine(phase));
    if p <= 0.0 {
        1.0 - p
    } else {
        p - p.trunc()
    }
}

/// 808 drum voice
pub struct Drum808 {
    sample_rate_recip: f32,
    /// Increment used for the current block
    w0: f32,
    /// Increment at the end of the glide
    w_target: f32,
    /// Increment at the start of the glide
    w_init: f32,
    /// 0 = fastest glide, 1 = no glide
    pitch_decay: f32,
    /// Glide position in [0, 1]
    hold_time: f32,
    phase: f32,
    dist: f32,
    drive: f32,
    /// Multiplier on the note increment at the start of the glide
    attack_pitch: f32,
    lfo: BlockRamp,
    flags: u8,
}

impl Drum808 {
    pub fn new(host: &HostConfig) -> Self {
        let mut drum = Self {
            sample_rate_recip: host.sample_rate_recip(),
            w0: 0.0,
            w_target: 0.0,
            w_init: 0.0,
            pitch_decay: 0.0,
            hold_time: 0.0,
            phase: 0.0,
            dist: 0.0,
            drive: 0.0,
            attack_pitch: 0.0,
            lfo: BlockRamp::default(),
            flags: FLAGS_NONE,
        };
        drum.init(host);
        drum
    }

    /// Resolve the glide endpoints and this block's increment
    fn update_pitch(&mut self, pitch: u16) {
        let (note, fine) = split_pitch(pitch);
        let w = note_to_increment(note as i32, fine as f32, self.sample_rate_recip);
        self.w_target = w / 2.0;
        self.w_init = w * self.attack_pitch;
        self.w0 = lerp(self.hold_time, self.w_init, self.w_target);
    }

    /// Hold-time advance per frame
    fn hold_rate(&self) -> f32 {
        self.sample_rate_recip * (HOLD_RATE - self.pitch_decay * HOLD_RATE)
    }

    pub fn glide_phase(&self) -> GlidePhase {
        if self.hold_time >= 1.0 {
            GlidePhase::Sustain
        } else {
            GlidePhase::Attack
        }
    }

    pub fn hold_time(&self) -> f32 {
        self.hold_time
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn increment(&self) -> f32 {
        self.w0
    }

    pub fn target_increment(&self) -> f32 {
        self.w_target
    }

    pub fn initial_increment(&self) -> f32 {
        self.w_init
    }

    pub fn pitch_decay(&self) -> f32 {
        self.pitch_decay
    }

    pub fn dist(&self) -> f32 {
        self.dist
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    pub fn attack_pitch(&self) -> f32 {
        self.attack_pitch
    }

    pub fn lfo(&self) -> f32 {
        self.lfo.target()
    }

    pub fn lfoz(&self) -> f32 {
        self.lfo.get()
    }

    pub fn is_reset_pending(&self) -> bool {
        self.flags & FLAG_RESET != 0
    }
}

impl Default for Drum808 {
    fn default() -> Self {
        Self::new(&HostConfig::default())
    }
}

impl OscUnit for Drum808 {
    fn init(&mut self, host: &HostConfig) {
        warm_up();
        self.sample_rate_recip = host.sample_rate_recip();
        self.w0 = 0.0;
        self.w_target = 0.0;
        self.w_init = 0.0;
        self.pitch_decay = 0.0;
        self.hold_time = 0.0;
        self.phase = 0.0;
        self.dist = 0.0;
        self.drive = 0.0;
        self.attack_pitch = 0.0;
        self.lfo = BlockRamp::default();
        self.flags = FLAGS_NONE;
    }

    fn cycle(&mut self, params: &UserOscParams, out: &mut [Q31]) {
        // Glide resolution is per block, not per frame
        self.update_pitch(params.pitch);

        if out.is_empty() {
            return;
        }

        let reset = self.flags & FLAG_RESET != 0;
        self.flags = FLAGS_NONE;
        if reset {
            self.phase = 0.0;
        }
        self.lfo.begin_block(q31_to_f32(params.shape_lfo), out.len(), reset);

        let w0 = self.w0;
        let dist = self.dist;
        let drive = self.drive;
        let rate = self.hold_rate();
        let mut phase = self.phase;
        let mut hold_time = self.hold_time;

        for y in out.iter_mut() {
            let p = warp_phase(phase, dist);
            *y = f32_to_q31(soft_clip(SOFT_CLIP_AMOUNT, drive * sine(p)));

            phase = wrap_phase(phase + w0);
            hold_time = clip01(hold_time + rate);
            self.lfo.tick();
        }

        self.phase = phase;
        self.hold_time = hold_time;
    }

    /// Retrigger: restart the glide and the phase
    fn note_on(&mut self, _params: &UserOscParams) {
        self.flags |= FLAG_RESET;
        self.hold_time = 0.0;
    }

    fn note_off(&mut self, _params: &UserOscParams) {}

    fn param(&mut self, param: OscParam, value: u16) {
        let valf = param_val_to_f32(value);
        match param {
            OscParam::Id1 => self.drive = 1.0 + valf,
            OscParam::Id2 => self.attack_pitch = 1.0 + valf * ATTACK_PITCH_RANGE,
            OscParam::Shape => self.pitch_decay = valf,
            OscParam::ShiftShape => self.dist = MAX_DIST * valf,
            OscParam::Id3 | OscParam::Id4 | OscParam::Id5 | OscParam::Id6 => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_drum() -> Drum808 {
        let mut drum = Drum808::default();
        drum.param(OscParam::Id1, 512);
        drum.param(OscParam::Id2, 200);
        drum.param(OscParam::Shape, 0);
        drum.param(OscParam::ShiftShape, 600);
        drum
    }

    #[test]
    fn test_init_zeroes_everything() {
        let drum = Drum808::default();
        assert_eq!(drum.drive(), 0.0);
        assert_eq!(drum.attack_pitch(), 0.0);
        assert_eq!(drum.hold_time(), 0.0);
        assert_eq!(drum.phase(), 0.0);
        assert_eq!(drum.glide_phase(), GlidePhase::Attack);
    }

    #[test]
    fn test_param_mapping() {
        let mut drum = Drum808::default();
        drum.param(OscParam::Id1, 1023);
        assert!((drum.drive() - 2.0).abs() < 1e-6);
        drum.param(OscParam::Id2, 1023);
        assert!((drum.attack_pitch() - 25.0).abs() < 1e-4);
        drum.param(OscParam::Shape, 1023);
        assert!((drum.pitch_decay() - 1.0).abs() < 1e-6);
        drum.param(OscParam::ShiftShape, 1023);
        assert!((drum.dist() - MAX_DIST).abs() < 1e-6);
        drum.param(OscParam::Id5, 0);
        assert!((drum.dist() - MAX_DIST).abs() < 1e-6);
    }

    #[test]
    fn test_glide_endpoints() {
        let mut drum = playing_drum();
        drum.cycle(&UserOscParams::for_note(36), &mut [0; 1]);
        let w = note_to_increment(36, 0.0, 1.0 / 48_000.0);
        assert!((drum.target_increment() - w / 2.0).abs() < 1e-9);
        assert!((drum.initial_increment() - w * drum.attack_pitch()).abs() < 1e-9);
        // First block starts at the attack pitch
        assert_eq!(drum.increment(), drum.initial_increment());
    }

    #[test]
    fn test_hold_time_rises_and_saturates() {
        let mut drum = playing_drum();
        let params = UserOscParams::for_note(36);
        drum.note_on(&params);

        let mut last = 0.0;
        let mut buf = [0; 64];
        // 20/s at 48 kHz saturates after 2400 frames
        for _ in 0..50 {
            drum.cycle(&params, &mut buf);
            let hold = drum.hold_time();
            assert!((0.0..=1.0).contains(&hold));
            assert!(hold >= last);
            last = hold;
        }
        assert_eq!(drum.glide_phase(), GlidePhase::Sustain);

        drum.cycle(&params, &mut buf);
        assert!((drum.increment() - drum.target_increment()).abs() < 1e-7);
    }

    #[test]
    fn test_full_decay_holds_attack_pitch() {
        let mut drum = playing_drum();
        drum.param(OscParam::Shape, 1023);
        let params = UserOscParams::for_note(40);
        drum.note_on(&params);
        for _ in 0..10 {
            drum.cycle(&params, &mut [0; 128]);
        }
        assert_eq!(drum.hold_time(), 0.0);
        assert_eq!(drum.increment(), drum.initial_increment());
    }

    #[test]
    fn test_note_on_retriggers() {
        let mut drum = playing_drum();
        let params = UserOscParams::for_note(36);
        drum.cycle(&params, &mut [0; 256]);
        assert!(drum.hold_time() > 0.0);

        drum.note_on(&params);
        assert_eq!(drum.hold_time(), 0.0);
        assert!(drum.is_reset_pending());

        let mut one = [0; 1];
        drum.cycle(&params, &mut one);
        // Phase restarted at 0 and advanced by exactly one increment
        assert_eq!(drum.phase(), drum.increment());
        assert_eq!(one[0], 0);
    }

    #[test]
    fn test_zero_frames_only_updates_pitch() {
        let mut drum = playing_drum();
        drum.note_on(&UserOscParams::for_note(36));
        drum.cycle(&UserOscParams::for_note(36), &mut []);
        assert!(drum.increment() > 0.0);
        assert_eq!(drum.hold_time(), 0.0);
        assert_eq!(drum.phase(), 0.0);
        assert!(drum.is_reset_pending());
    }

    #[test]
    fn test_phase_stays_wrapped() {
        let mut drum = playing_drum();
        drum.param(OscParam::Id2, 1023);
        let params = UserOscParams::for_note(100);
        drum.note_on(&params);
        let mut buf = [0; 48];
        for _ in 0..500 {
            drum.cycle(&params, &mut buf);
            assert!((0.0..1.0).contains(&drum.phase()));
        }
    }

    #[test]
    fn test_warp_phase() {
        assert_eq!(warp_phase(0.3, 0.0), 0.3);
        // dist enters squared: 0.75 + 0.49 * sin(1.5 pi)
        assert!((warp_phase(0.75, 0.7) - 0.26).abs() < 1e-5);
        // Exactly zero reflects to 1.0 rather than wrapping to 0.0
        assert_eq!(warp_phase(0.0, 0.5), 1.0);
        // Negative excursions are mirrored, not wrapped
        assert!((warp_phase(-0.25, 0.0) - 1.25).abs() < 1e-6);
    }

    #[test]
    fn test_output_is_driven_and_bounded() {
        let mut drum = playing_drum();
        drum.param(OscParam::Id1, 1023);
        let params = UserOscParams::for_note(45);
        drum.note_on(&params);
        let mut buf = [0; 512];
        drum.cycle(&params, &mut buf);
        let ceiling = f32_to_q31(0.95);
        assert!(buf.iter().all(|&s| s.saturating_abs() <= ceiling));
        assert!(buf.iter().any(|&s| s.saturating_abs() > ceiling / 2));
    }
}
