//! Note-to-frequency conversion
//!
//! Pitch arrives from the host packed as `note << 8 | fine`, where `fine`
//! is a fraction of a semitone in 1/255 steps. Units turn that into a phase
//! increment: cycles per sample at the host sample rate.

use crate::utils::lerp;

/// Highest note index the host's note table covers
pub const NOTE_MAX: i32 = 151;

/// Ceiling applied to every oscillator frequency (Hz)
pub const NOTE_MAX_HZ: f32 = 23_679.643;

/// Scale from a fine-tune step to a fraction of a semitone
pub const NOTE_MOD_SCALE: f32 = 1.0 / 255.0;

/// Split a packed host pitch into `(note, fine)`
#[inline]
pub fn split_pitch(pitch: u16) -> (u8, u8) {
    ((pitch >> 8) as u8, (pitch & 0xFF) as u8)
}

/// Equal-tempered frequency of a MIDI note (A4 = note 69 = 440 Hz)
///
/// Notes outside the host table are clamped to [0, 151].
#[inline]
pub fn note_hz(note: i32) -> f32 {
    let note = note.clamp(0, NOTE_MAX);
    440.0 * ((note - 69) as f32 / 12.0).exp2()
}

/// Phase increment for a note plus a fine offset
///
/// `fine` is in 1/255-semitone steps and may be negative or exceed 255
/// (detune spreads push it either way); the frequency is interpolated
/// linearly between the two neighbouring semitones.
///
/// # Arguments
/// * `note` - Semitone index (clamped to the note table)
/// * `fine` - Fine offset in 1/255 semitone steps
/// * `sample_rate_recip` - 1 / sample rate
#[inline]
pub fn note_to_increment(note: i32, fine: f32, sample_rate_recip: f32) -> f32 {
    let position = note as f32 + fine * NOTE_MOD_SCALE;
    let base = position.floor();
    let fraction = position - base;
    let base = base as i32;

    let hz = lerp(fraction, note_hz(base), note_hz(base + 1)).min(NOTE_MAX_HZ);
    hz * sample_rate_recip
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR_RECIP: f32 = 1.0 / 48_000.0;

    #[test]
    fn test_split_pitch() {
        assert_eq!(split_pitch(0x3C80), (60, 128));
        assert_eq!(split_pitch(0x0000), (0, 0));
    }

    #[test]
    fn test_a4_is_440() {
        assert!((note_hz(69) - 440.0).abs() < 1e-3);
        assert!((note_hz(81) - 880.0).abs() < 1e-2);
    }

    #[test]
    fn test_note_index_clamped() {
        assert_eq!(note_hz(-5), note_hz(0));
        assert_eq!(note_hz(400), note_hz(NOTE_MAX));
    }

    #[test]
    fn test_increment_without_fine() {
        let w = note_to_increment(69, 0.0, SR_RECIP);
        assert!((w - 440.0 / 48_000.0).abs() < 1e-7);
    }

    #[test]
    fn test_fine_interpolates_to_next_semitone() {
        let full = note_to_increment(60, 255.0, SR_RECIP);
        let next = note_to_increment(61, 0.0, SR_RECIP);
        assert!((full - next).abs() < 1e-7);

        let half = note_to_increment(60, 127.5, SR_RECIP);
        let mid = (note_to_increment(60, 0.0, SR_RECIP) + next) * 0.5;
        assert!((half - mid).abs() < 1e-7);
    }

    #[test]
    fn test_negative_fine_goes_below_note() {
        let below = note_to_increment(60, -51.0, SR_RECIP);
        assert!(below < note_to_increment(60, 0.0, SR_RECIP));
        assert!(below > note_to_increment(59, 0.0, SR_RECIP));
    }

    #[test]
    fn test_frequency_ceiling() {
        let w = note_to_increment(NOTE_MAX, 0.0, SR_RECIP);
        assert!((w - NOTE_MAX_HZ * SR_RECIP).abs() < 1e-7);
        assert!(w < 0.5);
    }
}
