//! C FFI bindings for the units
//!
//! Each unit is exposed to the host as an opaque pointer plus the callback
//! family the host drives: INIT, CYCLE / PROCESS, NOTEON, NOTEOFF and PARAM.
//! Every function tolerates null pointers and never unwinds into the caller.

use crate::effects::{DistortionFx, ModFxParam, ModFxUnit};
use crate::host::{HostConfig, ModuleKind};
use crate::instruments::{ChordOscillator, Drum808, OscParam, OscUnit, UserOscParams};
use crate::manifest::{UnitManifest, CHORDS_OSC, DISTORT_MOD, OSC_808};
use crate::utils::init_logger;
use std::slice;

// =============================================================================
// Shared oscillator plumbing
// =============================================================================

fn osc_new<O: OscUnit>(make: fn(&HostConfig) -> O, platform: u32, api: u32) -> *mut O {
    let host = HostConfig::negotiate_or_default(platform, api, ModuleKind::Osc);
    Box::into_raw(Box::new(make(&host)))
}

unsafe fn osc_init<O: OscUnit>(osc: *mut O, platform: u32, api: u32) {
    if let Some(osc) = osc.as_mut() {
        let host = HostConfig::negotiate_or_default(platform, api, ModuleKind::Osc);
        osc.init(&host);
    }
}

unsafe fn osc_cycle<O: OscUnit>(osc: *mut O, params: *const UserOscParams, yn: *mut i32, frames: u32) {
    if yn.is_null() {
        return;
    }
    let out = slice::from_raw_parts_mut(yn, frames as usize);
    match (osc.as_mut(), params.as_ref()) {
        (Some(osc), Some(params)) => osc.cycle(params, out),
        _ => out.fill(0),
    }
}

unsafe fn osc_note_on<O: OscUnit>(osc: *mut O, params: *const UserOscParams) {
    if let (Some(osc), Some(params)) = (osc.as_mut(), params.as_ref()) {
        osc.note_on(params);
    }
}

unsafe fn osc_note_off<O: OscUnit>(osc: *mut O, params: *const UserOscParams) {
    if let (Some(osc), Some(params)) = (osc.as_mut(), params.as_ref()) {
        osc.note_off(params);
    }
}

/// Dispatch a PARAM call that the unit's manifest declares, clamped to range
unsafe fn osc_param<O: OscUnit>(osc: *mut O, manifest: &UnitManifest, index: u16, value: u16) {
    let Some(osc) = osc.as_mut() else {
        return;
    };
    let Some(value) = manifest.validate(index, value as i32).and_then(|v| u16::try_from(v).ok()) else {
        return;
    };
    if let Some(param) = OscParam::from_index(index) {
        osc.param(param, value);
    }
}

unsafe fn osc_free<O: OscUnit>(osc: *mut O) {
    if !osc.is_null() {
        drop(Box::from_raw(osc));
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Route INIT diagnostics to stderr (desktop hosts only)
///
/// Honors `RUST_LOG`. Safe to call more than once.
#[no_mangle]
pub extern "C" fn logue_units_init_logging() {
    init_logger();
}

// =============================================================================
// Chord oscillator
// =============================================================================

/// Create and initialize a chord oscillator (INIT)
///
/// # Arguments
/// * `platform` - Host platform word (target and module bits)
/// * `api` - Host API version word (`0x00MMmmpp`)
///
/// # Returns
/// Pointer to a new instance. Must be freed with `chords_osc_free`.
#[no_mangle]
pub extern "C" fn chords_osc_new(platform: u32, api: u32) -> *mut ChordOscillator {
    osc_new(ChordOscillator::new, platform, api)
}

/// Re-run INIT on an existing chord oscillator
///
/// # Safety
/// `osc` must be a valid pointer returned by `chords_osc_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn chords_osc_init(osc: *mut ChordOscillator, platform: u32, api: u32) {
    osc_init(osc, platform, api);
}

/// Render `frames` Q31 samples into `yn` (CYCLE)
///
/// # Safety
/// - `osc` must be a valid pointer returned by `chords_osc_new`, or null
/// - `params` must point to a valid `UserOscParams`, or be null
/// - `yn` must point to at least `frames` writable `int32_t`, or be null
#[no_mangle]
pub unsafe extern "C" fn chords_osc_cycle(
    osc: *mut ChordOscillator,
    params: *const UserOscParams,
    yn: *mut i32,
    frames: u32,
) {
    osc_cycle(osc, params, yn, frames);
}

/// Note-on: restart voice phases on the next block (NOTEON)
///
/// # Safety
/// `osc` and `params` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn chords_osc_note_on(osc: *mut ChordOscillator, params: *const UserOscParams) {
    osc_note_on(osc, params);
}

/// Note-off (NOTEOFF)
///
/// # Safety
/// `osc` and `params` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn chords_osc_note_off(osc: *mut ChordOscillator, params: *const UserOscParams) {
    osc_note_off(osc, params);
}

/// Set a chord oscillator parameter (PARAM)
///
/// # Parameter indices
/// - 0 (Wave): 0-100
/// - 1 (Detune): 0-100
/// - 6 (Key / shape): 0-1023
/// - 7 (Extension / shift-shape): 0-1023
///
/// Other indices are ignored and values are clamped to the listed ranges.
///
/// # Safety
/// `osc` must be a valid pointer returned by `chords_osc_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn chords_osc_param(osc: *mut ChordOscillator, index: u16, value: u16) {
    osc_param(osc, &CHORDS_OSC, index, value);
}

/// Number of panel parameters the chord oscillator exposes
#[no_mangle]
pub extern "C" fn chords_osc_param_count() -> u32 {
    CHORDS_OSC.param_count()
}

/// Free a chord oscillator
///
/// # Safety
/// `osc` must be a valid pointer returned by `chords_osc_new`, or null.
/// After calling this function, the pointer is invalid and must not be used.
#[no_mangle]
pub unsafe extern "C" fn chords_osc_free(osc: *mut ChordOscillator) {
    osc_free(osc);
}

// =============================================================================
// 808 oscillator
// =============================================================================

/// Create and initialize an 808 oscillator (INIT)
///
/// Every setting starts at zero, so the voice is silent until the host has
/// sent its parameters.
///
/// # Returns
/// Pointer to a new instance. Must be freed with `osc808_free`.
#[no_mangle]
pub extern "C" fn osc808_new(platform: u32, api: u32) -> *mut Drum808 {
    osc_new(Drum808::new, platform, api)
}

/// Re-run INIT on an existing 808 oscillator
///
/// # Safety
/// `osc` must be a valid pointer returned by `osc808_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn osc808_init(osc: *mut Drum808, platform: u32, api: u32) {
    osc_init(osc, platform, api);
}

/// Render `frames` Q31 samples into `yn` (CYCLE)
///
/// # Safety
/// - `osc` must be a valid pointer returned by `osc808_new`, or null
/// - `params` must point to a valid `UserOscParams`, or be null
/// - `yn` must point to at least `frames` writable `int32_t`, or be null
#[no_mangle]
pub unsafe extern "C" fn osc808_cycle(osc: *mut Drum808, params: *const UserOscParams, yn: *mut i32, frames: u32) {
    osc_cycle(osc, params, yn, frames);
}

/// Note-on: retrigger the pitch glide and phase (NOTEON)
///
/// # Safety
/// `osc` and `params` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn osc808_note_on(osc: *mut Drum808, params: *const UserOscParams) {
    osc_note_on(osc, params);
}

/// Note-off (NOTEOFF)
///
/// # Safety
/// `osc` and `params` must be valid pointers, or null.
#[no_mangle]
pub unsafe extern "C" fn osc808_note_off(osc: *mut Drum808, params: *const UserOscParams) {
    osc_note_off(osc, params);
}

/// Set an 808 parameter (PARAM)
///
/// # Parameter indices
/// - 0 (Drive): 0-100
/// - 1 (Attack pitch): 0-100
/// - 6 (Decay / shape): 0-1023
/// - 7 (Dist / shift-shape): 0-1023
///
/// Other indices are ignored and values are clamped to the listed ranges.
///
/// # Safety
/// `osc` must be a valid pointer returned by `osc808_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn osc808_param(osc: *mut Drum808, index: u16, value: u16) {
    osc_param(osc, &OSC_808, index, value);
}

/// Number of panel parameters the 808 oscillator exposes
#[no_mangle]
pub extern "C" fn osc808_param_count() -> u32 {
    OSC_808.param_count()
}

/// Free an 808 oscillator
///
/// # Safety
/// `osc` must be a valid pointer returned by `osc808_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn osc808_free(osc: *mut Drum808) {
    osc_free(osc);
}

// =============================================================================
// Distortion mod-fx
// =============================================================================

/// Create and initialize a distortion mod-fx (INIT)
///
/// # Returns
/// Pointer to a new instance. Must be freed with `distort_mod_free`.
#[no_mangle]
pub extern "C" fn distort_mod_new(platform: u32, api: u32) -> *mut DistortionFx {
    let host = HostConfig::negotiate_or_default(platform, api, ModuleKind::ModFx);
    Box::into_raw(Box::new(DistortionFx::new(&host)))
}

/// Re-run INIT on an existing distortion mod-fx
///
/// # Safety
/// `fx` must be a valid pointer returned by `distort_mod_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn distort_mod_init(fx: *mut DistortionFx, platform: u32, api: u32) {
    if let Some(fx) = fx.as_mut() {
        let host = HostConfig::negotiate_or_default(platform, api, ModuleKind::ModFx);
        fx.init(&host);
    }
}

/// Shape one block of interleaved stereo audio (PROCESS)
///
/// Each buffer holds `2 * frames` floats. Input and output may be the same
/// buffer. The sub bus is only touched on platforms with a sub timbre, and
/// its buffers may be null; a null input silences its output.
///
/// # Safety
/// - `fx` must be a valid pointer returned by `distort_mod_new`, or null
/// - every non-null buffer must hold `2 * frames` floats
#[no_mangle]
pub unsafe extern "C" fn distort_mod_process(
    fx: *mut DistortionFx,
    main_xn: *const f32,
    main_yn: *mut f32,
    sub_xn: *const f32,
    sub_yn: *mut f32,
    frames: u32,
) {
    let Some(fx) = fx.as_mut() else {
        return;
    };
    let len = (frames as usize).saturating_mul(2);
    let buses = if fx.host().platform.has_sub_timbre() { 2 } else { 1 };

    fx.begin_block();
    for (input, output) in [(main_xn, main_yn), (sub_xn, sub_yn)].into_iter().take(buses) {
        match bus(input, output, len) {
            Bus::Split(input, output) => fx.process_bus(input, output),
            Bus::InPlace(buffer) => fx.process_bus_in_place(buffer),
            Bus::Silent(output) => output.fill(0.0),
            Bus::Absent => {}
        }
    }
}

/// Report the host tempo to the mod-fx
///
/// # Safety
/// `fx` must be a valid pointer returned by `distort_mod_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn distort_mod_set_tempo(fx: *mut DistortionFx, bpm: f32) {
    if let Some(fx) = fx.as_mut() {
        fx.set_tempo(bpm);
    }
}

/// Set a mod-fx parameter (PARAM)
///
/// # Parameter indices
/// - 0 (Time): Q31 0-1, selects soft clip / hard clip / wrap / fold
/// - 1 (Depth): Q31 0-1, pre-gain `10 * depth + 1`
///
/// Negative values clamp to 0.
///
/// # Safety
/// `fx` must be a valid pointer returned by `distort_mod_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn distort_mod_param(fx: *mut DistortionFx, index: u8, value: i32) {
    let Some(fx) = fx.as_mut() else {
        return;
    };
    let Some(value) = DISTORT_MOD.validate(index as u16, value) else {
        return;
    };
    if let Some(param) = ModFxParam::from_index(index) {
        fx.param(param, value);
    }
}

/// Number of panel parameters the mod-fx exposes
#[no_mangle]
pub extern "C" fn distort_mod_param_count() -> u32 {
    DISTORT_MOD.param_count()
}

/// Free a distortion mod-fx
///
/// # Safety
/// `fx` must be a valid pointer returned by `distort_mod_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn distort_mod_free(fx: *mut DistortionFx) {
    if !fx.is_null() {
        drop(Box::from_raw(fx));
    }
}

/// Borrowed view of one input/output buffer pair
enum Bus<'a> {
    Split(&'a [f32], &'a mut [f32]),
    InPlace(&'a mut [f32]),
    Silent(&'a mut [f32]),
    Absent,
}

unsafe fn bus<'a>(input: *const f32, output: *mut f32, len: usize) -> Bus<'a> {
    if output.is_null() {
        Bus::Absent
    } else if input.is_null() {
        Bus::Silent(slice::from_raw_parts_mut(output, len))
    } else if input == output as *const f32 {
        Bus::InPlace(slice::from_raw_parts_mut(output, len))
    } else {
        Bus::Split(slice::from_raw_parts(input, len), slice::from_raw_parts_mut(output, len))
    }
}
