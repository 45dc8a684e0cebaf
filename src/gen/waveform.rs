//! Phase-driven waveform evaluators
//!
//! All evaluators take a phase in cycles and accept any finite value; the
//! phase is reduced into [0, 1) internally. Saw and square read from
//! band-limited additive wavetables built once per process.

use std::f32::consts::TAU;
use std::sync::OnceLock;

/// Wavetable length (one cycle); each table carries one guard point
pub const TABLE_SIZE: usize = 1024;

/// Harmonics summed into the saw table
const SAW_HARMONICS: usize = 24;

/// Highest odd harmonic summed into the square table
const SQUARE_HARMONICS: usize = 23;

/// Oscillator waveform for the chord stack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Saw,
    Square,
    Sine,
}

impl Waveform {
    /// Map the stored wave-type byte to a waveform
    ///
    /// 0 is saw, 1 is square; every other value falls through to sine.
    pub fn from_wave_type(wave_type: u8) -> Self {
        match wave_type {
            0 => Waveform::Saw,
            1 => Waveform::Square,
            _ => Waveform::Sine,
        }
    }

    /// Evaluate at `phase` (cycles)
    #[inline]
    pub fn eval(self, phase: f32) -> f32 {
        match self {
            Waveform::Saw => saw(phase),
            Waveform::Square => square(phase),
            Waveform::Sine => sine(phase),
        }
    }
}

struct Wavetables {
    saw: [f32; TABLE_SIZE + 1],
    square: [f32; TABLE_SIZE + 1],
}

impl Wavetables {
    fn build() -> Self {
        let mut saw = [0.0f32; TABLE_SIZE + 1];
        let mut square = [0.0f32; TABLE_SIZE + 1];

        for i in 0..TABLE_SIZE {
            let x = i as f32 / TABLE_SIZE as f32;
            for k in 1..=SAW_HARMONICS {
                let sign = if k % 2 == 0 { -1.0 } else { 1.0 };
                saw[i] += sign * (TAU * k as f32 * x).sin() / k as f32;
            }
            for k in (1..=SQUARE_HARMONICS).step_by(2) {
                square[i] += (TAU * k as f32 * x).sin() / k as f32;
            }
        }

        normalize(&mut saw[..TABLE_SIZE]);
        normalize(&mut square[..TABLE_SIZE]);
        saw[TABLE_SIZE] = saw[0];
        square[TABLE_SIZE] = square[0];

        Self { saw, square }
    }
}

/// Scale a table so its peak magnitude is 1.0
fn normalize(table: &mut [f32]) {
    let peak = table.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
    if peak > 0.0 {
        for s in table.iter_mut() {
            *s /= peak;
        }
    }
}

static WAVETABLES: OnceLock<Wavetables> = OnceLock::new();

fn tables() -> &'static Wavetables {
    WAVETABLES.get_or_init(Wavetables::build)
}

/// Build the wavetables ahead of the first render call
///
/// Units call this from INIT so the audio path never pays for table setup.
pub fn warm_up() {
    let _ = tables();
}

/// Reduce any finite phase into [0, 1)
#[inline]
fn reduce(phase: f32) -> f32 {
    let p = phase - phase.floor();
    if p >= 1.0 || !p.is_finite() {
        0.0
    } else {
        p
    }
}

#[inline]
fn read(table: &[f32; TABLE_SIZE + 1], phase: f32) -> f32 {
    let pos = reduce(phase) * TABLE_SIZE as f32;
    let index = (pos as usize).min(TABLE_SIZE - 1);
    let fraction = pos - index as f32;
    let a = table[index];
    let b = table[index + 1];
    a + fraction * (b - a)
}

/// Sine at `phase` cycles
#[inline]
pub fn sine(phase: f32) -> f32 {
    (TAU * reduce(phase)).sin()
}

/// Band-limited saw at `phase` cycles
#[inline]
pub fn saw(phase: f32) -> f32 {
    read(&tables().saw, phase)
}

/// Band-limited square at `phase` cycles
#[inline]
pub fn square(phase: f32) -> f32 {
    read(&tables().square, phase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_type_mapping() {
        assert_eq!(Waveform::from_wave_type(0), Waveform::Saw);
        assert_eq!(Waveform::from_wave_type(1), Waveform::Square);
        assert_eq!(Waveform::from_wave_type(2), Waveform::Sine);
        assert_eq!(Waveform::from_wave_type(3), Waveform::Sine);
        assert_eq!(Waveform::from_wave_type(200), Waveform::Sine);
    }

    #[test]
    fn test_sine_quadrants() {
        assert!(sine(0.0).abs() < 1e-6);
        assert!((sine(0.25) - 1.0).abs() < 1e-6);
        assert!((sine(0.75) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_evaluators_wrap_phase() {
        for &w in &[Waveform::Saw, Waveform::Square, Waveform::Sine] {
            assert!((w.eval(0.3) - w.eval(1.3)).abs() < 1e-4);
            assert!((w.eval(0.3) - w.eval(-0.7)).abs() < 1e-4);
        }
    }

    #[test]
    fn test_tables_are_normalized() {
        warm_up();
        for &w in &[Waveform::Saw, Waveform::Square] {
            let peak = (0..TABLE_SIZE)
                .map(|i| w.eval(i as f32 / TABLE_SIZE as f32).abs())
                .fold(0.0f32, f32::max);
            assert!((peak - 1.0).abs() < 1e-3, "{:?} peak {}", w, peak);
        }
    }

    #[test]
    fn test_square_polarity() {
        assert!(square(0.25) > 0.5);
        assert!(square(0.75) < -0.5);
    }

    #[test]
    fn test_saw_is_odd_around_zero() {
        assert!(saw(0.0).abs() < 1e-4);
        assert!((saw(0.2) + saw(0.8)).abs() < 1e-3);
    }
}
