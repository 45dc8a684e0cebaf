//! Distortion mod-fx
//!
//! Drives the main and sub buses through one of four waveshapers. Every
//! sample is shaped independently; the only state is the two knob settings.

use super::{DistortionKind, Effect, ModFxParam, ModFxUnit, Waveshaper};
use crate::host::HostConfig;
use crate::utils::{clip01, q31_to_f32};

/// Distortion unit
pub struct DistortionFx {
    host: HostConfig,
    /// Pre-gain amount (0-1)
    depth: f32,
    kind: DistortionKind,
    /// Tempo as seen by the last processed block
    block_tempo: f32,
}

impl DistortionFx {
    pub fn new(host: &HostConfig) -> Self {
        let mut fx = Self {
            host: *host,
            depth: 0.0,
            kind: DistortionKind::SoftClip,
            block_tempo: 0.0,
        };
        fx.init(host);
        fx
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn kind(&self) -> DistortionKind {
        self.kind
    }

    /// Shaper for the current settings
    pub fn shaper(&self) -> Waveshaper {
        Waveshaper::new(self.kind, self.depth)
    }

    pub fn host(&self) -> &HostConfig {
        &self.host
    }

    /// Tempo read at the start of the last block (not used in the gain path)
    pub fn block_tempo(&self) -> f32 {
        self.block_tempo
    }
}

impl Default for DistortionFx {
    fn default() -> Self {
        Self::new(&HostConfig::default())
    }
}

/// Shape `input` into `output`; output samples past the input are silenced
#[inline]
fn shape_bus(shaper: &Waveshaper, input: &[f32], output: &mut [f32]) {
    let n = input.len().min(output.len());
    let (head, tail) = output.split_at_mut(n);
    for (y, &x) in head.iter_mut().zip(input.iter()) {
        *y = shaper.process(x);
    }
    tail.fill(0.0);
}

impl ModFxUnit for DistortionFx {
    fn init(&mut self, host: &HostConfig) {
        self.host = *host;
        self.depth = 1.0;
        self.kind = DistortionKind::HardClip;
        self.block_tempo = host.tempo_bpm();
    }

    fn begin_block(&mut self) {
        self.block_tempo = self.host.tempo_bpm();
    }

    fn process_bus(&self, input: &[f32], output: &mut [f32]) {
        shape_bus(&self.shaper(), input, output);
    }

    fn process_bus_in_place(&self, buffer: &mut [f32]) {
        let shaper = self.shaper();
        for s in buffer.iter_mut() {
            *s = shaper.process(*s);
        }
    }

    fn param(&mut self, param: ModFxParam, value: i32) {
        let valf = q31_to_f32(value);
        match param {
            ModFxParam::Time => self.kind = DistortionKind::from_knob(valf),
            ModFxParam::Depth => self.depth = clip01(valf),
        }
    }

    fn set_tempo(&mut self, tempo_bpm: f32) {
        self.host.set_tempo(tempo_bpm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::f32_to_q31;

    #[test]
    fn test_init_defaults() {
        let fx = DistortionFx::default();
        assert_eq!(fx.depth(), 1.0);
        assert_eq!(fx.kind(), DistortionKind::HardClip);
        assert_eq!(fx.shaper().gain(), 11.0);
    }

    #[test]
    fn test_time_knob_selects_kind() {
        let mut fx = DistortionFx::default();
        let cases = [
            (0.1, DistortionKind::SoftClip),
            (0.3, DistortionKind::HardClip),
            (0.6, DistortionKind::Wrap),
            (0.9, DistortionKind::Fold),
        ];
        for (knob, kind) in cases {
            fx.param(ModFxParam::Time, f32_to_q31(knob));
            assert_eq!(fx.kind(), kind);
        }
    }

    #[test]
    fn test_depth_knob() {
        let mut fx = DistortionFx::default();
        fx.param(ModFxParam::Depth, f32_to_q31(0.5));
        assert!((fx.depth() - 0.5).abs() < 1e-6);
        fx.param(ModFxParam::Depth, i32::MIN);
        assert_eq!(fx.depth(), 0.0);
    }

    #[test]
    fn test_soft_clip_at_zero_depth() {
        let mut fx = DistortionFx::default();
        fx.param(ModFxParam::Time, 0);
        fx.param(ModFxParam::Depth, 0);

        let input = [0.1f32, -0.1, 0.1, -0.1];
        let mut output = [0.0f32; 4];
        fx.process(&input, &mut output, None);
        assert!((output[0] - 0.09985).abs() < 1e-6);
        assert!((output[1] + 0.09985).abs() < 1e-6);
    }

    #[test]
    fn test_main_and_sub_are_shaped_alike() {
        let mut fx = DistortionFx::default();
        fx.param(ModFxParam::Time, f32_to_q31(0.8));
        fx.param(ModFxParam::Depth, f32_to_q31(0.4));

        let input: Vec<f32> = (0..64).map(|i| ((i as f32) * 0.37).sin() * 0.8).collect();
        let mut main_out = vec![0.0f32; 64];
        let mut sub_out = vec![1.0f32; 64];
        fx.process(&input, &mut main_out, Some((input.as_slice(), sub_out.as_mut_slice())));
        assert_eq!(main_out, sub_out);
        assert!(main_out.iter().all(|s| s.abs() <= 0.15 + 1e-6));
    }

    #[test]
    fn test_short_input_silences_tail() {
        let mut fx = DistortionFx::default();
        let input = [0.01f32; 4];
        let mut output = [9.0f32; 8];
        fx.process(&input, &mut output, None);
        assert!(output[..4].iter().all(|&s| (s - 0.11).abs() < 1e-6));
        assert!(output[4..].iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_in_place_matches_split() {
        let mut fx = DistortionFx::default();
        fx.param(ModFxParam::Time, f32_to_q31(0.55));
        let input: Vec<f32> = (0..32).map(|i| (i as f32 - 16.0) * 0.02).collect();
        let mut split = vec![0.0f32; 32];
        fx.process_bus(&input, &mut split);
        let mut in_place = input.clone();
        fx.process_bus_in_place(&mut in_place);
        assert_eq!(split, in_place);
    }

    #[test]
    fn test_tempo_is_tracked_per_block() {
        let mut fx = DistortionFx::default();
        fx.set_tempo(133.0);
        assert_eq!(fx.block_tempo(), 120.0);
        fx.process(&[], &mut [], None);
        assert_eq!(fx.block_tempo(), 133.0);
    }
}
