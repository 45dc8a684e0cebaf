//! Chord oscillator
//!
//! Twelve detuned voices spread over a four-note chord. The chord is looked
//! up per block from a diatonic quality table indexed by the played note plus
//! the key offset; the extension setting picks how many chord tones the
//! voices cover and how the detune is spread across them.

use super::{OscParam, OscUnit, UserOscParams};
use crate::gen::{note_to_increment, saw, sine, split_pitch, square, warm_up, Waveform};
use crate::host::HostConfig;
use crate::utils::{f32_to_q31, param_val_to_f32, q31_to_f32, soft_clip, wrap_phase, BlockRamp, Q31};

/// Number of voices in the stack
pub const VOICES: usize = 12;

/// Highest extension setting
pub const MAX_EXTENSION: u8 = 4;

/// Mix gain applied to the voice sum
const VOICE_GAIN: f32 = 0.1;

/// Cubic amount of the output soft clip
const SOFT_CLIP_AMOUNT: f32 = 0.05;

const FLAGS_NONE: u8 = 0;
const FLAG_RESET: u8 = 1 << 0;

/// Semitone offsets of the four chord tones, one row per scale position.
/// A leading -1 voices the chord from one semitone below the played note.
pub const CHORD_TABLE: [[i8; 4]; 12] = [
    [0, 7, 4, 11],  // I
    [-1, 6, 4, 10], // I
    [0, 7, 3, 10],  // ii
    [-1, 6, 4, 9],  // ii
    [0, 7, 3, 10],  // iii
    [0, 7, 4, 11],  // IV
    [-1, 6, 5, 10], // IV
    [0, 7, 4, 10],  // V
    [-1, 6, 4, 9],  // V
    [0, 7, 3, 10],  // vi
    [-1, 6, 5, 9],  // vi
    [0, 6, 3, 10],  // vii dim
];

/// One voice of a layout: which chord tone it plays and its detune weight
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoiceSlot {
    /// Index into the resolved chord tones
    pub note: usize,
    /// Multiplier applied to the detune amount (fine-tune steps)
    pub detune: f32,
}

const fn slot(note: usize, detune: f32) -> VoiceSlot {
    VoiceSlot { note, detune }
}

/// Voice layouts per extension setting
///
/// 0: one tone, twelve-way spread; 1: two tones, six-way; 2: three tones,
/// four-way; 3 and 4: all four tones, each at +detune / center / -detune.
pub const VOICE_LAYOUTS: [[VoiceSlot; VOICES]; 5] = [
    [
        slot(0, 1.0),
        slot(0, 0.8),
        slot(0, 0.6),
        slot(0, 0.4),
        slot(0, 0.2),
        slot(0, 0.1),
        slot(0, -0.1),
        slot(0, -0.2),
        slot(0, -0.4),
        slot(0, -0.6),
        slot(0, -0.8),
        slot(0, -1.0),
    ],
    [
        slot(0, 1.0),
        slot(0, 0.6),
        slot(0, 0.3),
        slot(0, -0.3),
        slot(0, -0.6),
        slot(0, -1.0),
        slot(1, 1.0),
        slot(1, 0.6),
        slot(1, 0.3),
        slot(1, -0.3),
        slot(1, -0.6),
        slot(1, -1.0),
    ],
    [
        slot(0, 1.0),
        slot(0, 0.5),
        slot(0, -0.5),
        slot(0, -1.0),
        slot(1, 1.0),
        slot(1, 0.5),
        slot(1, -0.5),
        slot(1, -1.0),
        slot(2, 1.0),
        slot(2, 0.5),
        slot(2, -0.5),
        slot(2, -1.0),
    ],
    FOUR_TONE_LAYOUT,
    FOUR_TONE_LAYOUT,
];

const FOUR_TONE_LAYOUT: [VoiceSlot; VOICES] = [
    slot(0, 1.0),
    slot(0, 0.0),
    slot(0, -1.0),
    slot(1, 1.0),
    slot(1, 0.0),
    slot(1, -1.0),
    slot(2, 1.0),
    slot(2, 0.0),
    slot(2, -1.0),
    slot(3, 1.0),
    slot(3, 0.0),
    slot(3, -1.0),
];

/// Chord tones for a played note and key offset
#[inline]
pub fn chord_notes(root: u8, key: u8) -> [i8; 4] {
    CHORD_TABLE[(root as usize + key as usize) % 12]
}

/// Twelve-voice chord oscillator
pub struct ChordOscillator {
    sample_rate_recip: f32,
    /// Raw wave-type byte (0 saw, 1 square, otherwise sine)
    wave_type: u8,
    /// Key offset into the chord table
    key: u8,
    /// Voice layout selector (0-4)
    extension: u8,
    /// Chord tones resolved on the last block
    notes: [i8; 4],
    /// Per-voice phase increments computed on the last block
    w0: [f32; VOICES],
    /// Per-voice phase, always in [0, 1)
    phase: [f32; VOICES],
    /// Detune spread in fine-tune steps
    detune: f32,
    /// Shape LFO: block target and per-frame ramp
    lfo: BlockRamp,
    flags: u8,
}

impl ChordOscillator {
    pub fn new(host: &HostConfig) -> Self {
        let mut osc = Self {
            sample_rate_recip: host.sample_rate_recip(),
            wave_type: 0,
            key: 0,
            extension: 0,
            notes: [0; 4],
            w0: [0.0; VOICES],
            phase: [0.0; VOICES],
            detune: 0.0,
            lfo: BlockRamp::default(),
            flags: FLAGS_NONE,
        };
        osc.init(host);
        osc
    }

    /// Resolve chord tones and voice increments for a played pitch
    fn update_pitch(&mut self, pitch: u16) {
        let (root, fine) = split_pitch(pitch);
        self.notes = chord_notes(root, self.key);

        let layout = &VOICE_LAYOUTS[self.extension.min(MAX_EXTENSION) as usize];
        for (w, voice) in self.w0.iter_mut().zip(layout.iter()) {
            let note = root as i32 + self.notes[voice.note] as i32;
            let fine = fine as f32 + self.detune * voice.detune;
            *w = note_to_increment(note, fine, self.sample_rate_recip);
        }
    }

    /// Sum all voices through `shape`, advancing the phases
    #[inline]
    fn render<F: Fn(f32) -> f32>(&mut self, out: &mut [Q31], shape: F) {
        let w0 = self.w0;
        let mut phase = self.phase;

        for y in out.iter_mut() {
            let sum: f32 = phase.iter().map(|&p| shape(p)).sum();
            *y = f32_to_q31(soft_clip(SOFT_CLIP_AMOUNT, sum * VOICE_GAIN));

            for (p, w) in phase.iter_mut().zip(w0.iter()) {
                *p = wrap_phase(*p + w);
            }
            self.lfo.tick();
        }

        self.phase = phase;
    }

    pub fn wave_type(&self) -> u8 {
        self.wave_type
    }

    pub fn waveform(&self) -> Waveform {
        Waveform::from_wave_type(self.wave_type)
    }

    pub fn key(&self) -> u8 {
        self.key
    }

    pub fn extension(&self) -> u8 {
        self.extension
    }

    pub fn detune(&self) -> f32 {
        self.detune
    }

    pub fn notes(&self) -> [i8; 4] {
        self.notes
    }

    pub fn increments(&self) -> &[f32; VOICES] {
        &self.w0
    }

    pub fn phases(&self) -> &[f32; VOICES] {
        &self.phase
    }

    /// Shape LFO target of the last block
    pub fn lfo(&self) -> f32 {
        self.lfo.target()
    }

    /// Smoothed shape LFO at the end of the last block
    pub fn lfoz(&self) -> f32 {
        self.lfo.get()
    }

    /// Whether the next block restarts the voice phases
    pub fn is_reset_pending(&self) -> bool {
        self.flags & FLAG_RESET != 0
    }
}

impl Default for ChordOscillator {
    fn default() -> Self {
        Self::new(&HostConfig::default())
    }
}

impl OscUnit for ChordOscillator {
    fn init(&mut self, host: &HostConfig) {
        warm_up();
        self.sample_rate_recip = host.sample_rate_recip();
        self.wave_type = 0;
        self.key = 0;
        self.extension = 0;
        self.notes = [0; 4];
        self.w0 = [0.0; VOICES];
        self.phase = [0.0; VOICES];
        self.detune = 0.0;
        self.lfo = BlockRamp::default();
        self.flags = FLAGS_NONE;
    }

    fn cycle(&mut self, params: &UserOscParams, out: &mut [Q31]) {
        self.update_pitch(params.pitch);

        // An empty block keeps any pending reset for the next real one
        if out.is_empty() {
            return;
        }

        let reset = self.flags & FLAG_RESET != 0;
        self.flags = FLAGS_NONE;
        if reset {
            self.phase = [0.0; VOICES];
        }
        self.lfo.begin_block(q31_to_f32(params.shape_lfo), out.len(), reset);

        match self.waveform() {
            Waveform::Saw => self.render(out, saw),
            Waveform::Square => self.render(out, square),
            Waveform::Sine => self.render(out, sine),
        }
    }

    /// Restarts the voice phases on the next block; there is no envelope
    fn note_on(&mut self, _params: &UserOscParams) {
        self.flags |= FLAG_RESET;
    }

    fn note_off(&mut self, _params: &UserOscParams) {}

    fn param(&mut self, param: OscParam, value: u16) {
        let valf = param_val_to_f32(value);
        match param {
            // Scaled from the raw percent value, not the normalized one
            OscParam::Id1 => self.wave_type = (value as f32 / 100.0 * 3.0) as u8,
            OscParam::Id2 => self.detune = 255.0 * valf,
            OscParam::Shape => self.key = (11.0 * valf) as u8,
            OscParam::ShiftShape => self.extension = (4.0 * valf) as u8,
            OscParam::Id3 | OscParam::Id4 | OscParam::Id5 | OscParam::Id6 => {}
        }
    }
}
