//! Integration tests for the distortion mod-fx

use logue_units::effects::{fold, wrap, DistortionFx, DistortionKind, ModFxParam, ModFxUnit, SHAPER_LIMIT};
use logue_units::host::HostConfig;
use logue_units::utils::f32_to_q31;

fn knob(valf: f32) -> i32 {
    f32_to_q31(valf)
}

fn sweep(frames: usize) -> Vec<f32> {
    (0..2 * frames).map(|i| (i as f32 - frames as f32) / frames as f32).collect()
}

#[test]
fn test_soft_clip_unity_gain() {
    let mut fx = DistortionFx::default();
    fx.param(ModFxParam::Time, knob(0.0));
    fx.param(ModFxParam::Depth, knob(0.0));

    let input = [0.1f32; 8];
    let mut output = [0.0f32; 8];
    fx.process(&input, &mut output, None);
    let expected = 0.1 - 0.15 * 0.1f32.powi(3);
    assert!(output.iter().all(|&y| (y - expected).abs() < 1e-6));
}

#[test]
fn test_every_kind_stays_inside_window() {
    let input = sweep(512);
    for time in [0.1, 0.3, 0.6, 0.9] {
        for depth in [0.0, 0.5, 1.0] {
            let mut fx = DistortionFx::default();
            fx.param(ModFxParam::Time, knob(time));
            fx.param(ModFxParam::Depth, knob(depth));
            let mut output = vec![0.0f32; input.len()];
            fx.process(&input, &mut output, None);
            assert!(
                output.iter().all(|y| y.abs() <= SHAPER_LIMIT + 1e-6),
                "{:?} depth {}",
                fx.kind(),
                depth
            );
        }
    }
}

#[test]
fn test_wrap_periodicity() {
    let span = 2.0 * SHAPER_LIMIT;
    for i in 0..50 {
        let x = -0.14 + i as f32 * 0.0056;
        for k in 1..4 {
            let shifted = x + span * k as f32;
            assert!((wrap(shifted, SHAPER_LIMIT) - wrap(x, SHAPER_LIMIT)).abs() < 1e-4);
        }
    }
}

#[test]
fn test_fold_has_no_jump_at_limit() {
    let step = 1e-3;
    let mut last = fold(SHAPER_LIMIT - 20.0 * step, SHAPER_LIMIT);
    for i in -19..=20 {
        let y = fold(SHAPER_LIMIT + i as f32 * step, SHAPER_LIMIT);
        assert!((y - last).abs() <= step * 1.01, "jump near limit at step {}", i);
        last = y;
    }
}

#[test]
fn test_extreme_input_is_bounded_and_finite() {
    let input = [1e30f32, -1e30, f32::MAX, f32::MIN, f32::INFINITY, f32::NAN];
    for kind_knob in [0.1, 0.3, 0.6, 0.9] {
        let mut fx = DistortionFx::default();
        fx.param(ModFxParam::Time, knob(kind_knob));
        let mut output = [0.0f32; 6];
        fx.process_bus(&input, &mut output);
        if fx.kind() != DistortionKind::SoftClip && fx.kind() != DistortionKind::HardClip {
            assert!(output.iter().all(|y| y.is_finite() && y.abs() <= SHAPER_LIMIT + 1e-6));
        }
        assert!(output[..4].iter().all(|y| y.is_finite()));
    }
}

#[test]
fn test_reinit_restores_defaults() {
    let mut fx = DistortionFx::default();
    fx.param(ModFxParam::Time, knob(0.9));
    fx.param(ModFxParam::Depth, knob(0.2));
    fx.init(&HostConfig::default());
    assert_eq!(fx.kind(), DistortionKind::HardClip);
    assert_eq!(fx.depth(), 1.0);
}

#[test]
fn test_blocks_are_independent() {
    let mut fx = DistortionFx::default();
    fx.param(ModFxParam::Time, knob(0.7));
    let input = sweep(64);

    let mut whole = vec![0.0f32; input.len()];
    fx.process(&input, &mut whole, None);

    let mut pieces = vec![0.0f32; input.len()];
    for (xn, yn) in input.chunks(16).zip(pieces.chunks_mut(16)) {
        fx.process(xn, yn, None);
    }
    assert_eq!(whole, pieces);
}
