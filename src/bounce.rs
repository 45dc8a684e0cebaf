//! Offline rendering to WAV files
//!
//! Drives a unit the way a host would (INIT already done by the caller,
//! then NOTEON and a run of CYCLE / PROCESS blocks) and writes the result
//! with hound. Meant for auditioning units on a desktop, never for the
//! audio thread.

use crate::effects::ModFxUnit;
use crate::instruments::{OscUnit, UserOscParams};
use crate::utils::Q31;
use anyhow::{ensure, Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

/// Host block size used when the caller passes zero
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Render `frames` samples of a triggered oscillator
///
/// The note is struck once before the first block; `params` is delivered
/// unchanged with every block.
pub fn render_osc<O: OscUnit>(unit: &mut O, params: &UserOscParams, frames: usize, block_size: usize) -> Vec<Q31> {
    let block_size = if block_size == 0 { DEFAULT_BLOCK_SIZE } else { block_size };
    let mut out = vec![0; frames];

    unit.note_on(params);
    for block in out.chunks_mut(block_size) {
        unit.cycle(params, block);
    }
    out
}

/// Render an oscillator and write it as a mono 32-bit integer WAV
pub fn bounce_osc<O: OscUnit>(
    unit: &mut O,
    params: &UserOscParams,
    frames: usize,
    block_size: usize,
    sample_rate: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    ensure!(sample_rate > 0, "sample rate must be positive");

    let samples = render_osc(unit, params, frames, block_size);

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Int,
    };
    let mut writer =
        WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;
    for &sample in &samples {
        writer.write_sample(sample)?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;

    log::info!("bounced {} frames to {}", frames, path.display());
    Ok(())
}

/// Run interleaved stereo audio through a mod-fx in host-sized blocks
///
/// A trailing half frame is dropped.
pub fn render_modfx<F: ModFxUnit>(fx: &mut F, input: &[f32], block_size: usize) -> Vec<f32> {
    let block_size = if block_size == 0 { DEFAULT_BLOCK_SIZE } else { block_size };
    let len = input.len() - input.len() % 2;
    let mut out = vec![0.0; len];

    for (xn, yn) in input[..len]
        .chunks(block_size * 2)
        .zip(out.chunks_mut(block_size * 2))
    {
        fx.process(xn, yn, None);
    }
    out
}

/// Process interleaved stereo audio and write it as a 32-bit float WAV
pub fn bounce_modfx<F: ModFxUnit>(
    fx: &mut F,
    input: &[f32],
    block_size: usize,
    sample_rate: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    ensure!(sample_rate > 0, "sample rate must be positive");

    let samples = render_modfx(fx, input, block_size);

    let spec = WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer =
        WavWriter::create(path, spec).with_context(|| format!("creating {}", path.display()))?;
    for &sample in &samples {
        writer.write_sample(sample)?;
    }
    writer
        .finalize()
        .with_context(|| format!("finalizing {}", path.display()))?;

    log::info!("bounced {} stereo frames to {}", samples.len() / 2, path.display());
    Ok(())
}
