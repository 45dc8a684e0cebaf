//! Static unit descriptions
//!
//! Each unit ships with a manifest naming it and describing the panel
//! parameters the host shows for it. The C entry points check every PARAM
//! call against it: undeclared indices are dropped and values are clamped
//! to the declared range before they reach a unit.

use crate::host::{ApiVersion, ModuleKind};

/// How the host displays a parameter value
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Integer percentage
    Percent,
    /// Plain integer
    Plain,
    /// 10-bit knob (shape / shift-shape)
    Knob,
    /// Mod-fx knob delivered as Q31, 0 to full scale
    Q31,
}

/// One panel parameter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamDescriptor {
    /// Host parameter index
    pub index: u16,
    pub name: &'static str,
    pub min: i32,
    pub max: i32,
    pub kind: ParamKind,
}

impl ParamDescriptor {
    const fn new(index: u16, name: &'static str, min: i32, max: i32, kind: ParamKind) -> Self {
        Self {
            index,
            name,
            min,
            max,
            kind,
        }
    }

    /// Clamp a raw host value into the declared range
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// Unit identity and parameter list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitManifest {
    pub name: &'static str,
    pub module: ModuleKind,
    pub api: ApiVersion,
    pub version: &'static str,
    pub params: &'static [ParamDescriptor],
}

impl UnitManifest {
    /// Number of parameters the unit exposes
    pub fn param_count(&self) -> u32 {
        self.params.len() as u32
    }

    /// Descriptor for a host parameter index
    pub fn param(&self, index: u16) -> Option<&ParamDescriptor> {
        self.params.iter().find(|p| p.index == index)
    }

    pub fn has_param(&self, index: u16) -> bool {
        self.param(index).is_some()
    }

    /// Check a PARAM call: `None` for undeclared indices, otherwise the
    /// value clamped to the descriptor's range
    pub fn validate(&self, index: u16, value: i32) -> Option<i32> {
        self.param(index).map(|p| p.clamp(value))
    }
}

pub const CHORDS_OSC: UnitManifest = UnitManifest {
    name: "chords",
    module: ModuleKind::Osc,
    api: ApiVersion::CURRENT,
    version: "1.0-0",
    params: &[
        ParamDescriptor::new(0, "Wave", 0, 100, ParamKind::Percent),
        ParamDescriptor::new(1, "Detune", 0, 100, ParamKind::Percent),
        ParamDescriptor::new(6, "Key", 0, 1023, ParamKind::Knob),
        ParamDescriptor::new(7, "Extension", 0, 1023, ParamKind::Knob),
    ],
};

pub const OSC_808: UnitManifest = UnitManifest {
    name: "808",
    module: ModuleKind::Osc,
    api: ApiVersion::CURRENT,
    version: "1.0-0",
    params: &[
        ParamDescriptor::new(0, "Drive", 0, 100, ParamKind::Percent),
        ParamDescriptor::new(1, "Attack", 0, 100, ParamKind::Percent),
        ParamDescriptor::new(6, "Decay", 0, 1023, ParamKind::Knob),
        ParamDescriptor::new(7, "Dist", 0, 1023, ParamKind::Knob),
    ],
};

pub const DISTORT_MOD: UnitManifest = UnitManifest {
    name: "distort",
    module: ModuleKind::ModFx,
    api: ApiVersion::CURRENT,
    version: "1.0-0",
    params: &[
        ParamDescriptor::new(0, "Type", 0, i32::MAX, ParamKind::Q31),
        ParamDescriptor::new(1, "Depth", 0, i32::MAX, ParamKind::Q31),
    ],
};
