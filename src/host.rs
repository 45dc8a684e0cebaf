//! Host negotiation and runtime configuration
//!
//! At INIT the host passes two words: a platform word (target in the high
//! byte, module kind in the low byte) and a packed API version. Units turn
//! them into a [`HostConfig`] that also carries the sample rate and tempo.

use anyhow::{bail, ensure, Result};

/// Sample rate of every supported logue platform
pub const DEFAULT_SAMPLE_RATE: f32 = 48_000.0;

/// Tempo reported before the host sends one
pub const DEFAULT_TEMPO_BPM: f32 = 120.0;

/// Supported API major version
pub const API_MAJOR: u8 = 1;

/// Target hardware platform
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Prologue,
    MinilogueXd,
    NutektDigital,
}

impl Platform {
    /// Platform bits of the host's platform word
    pub fn bits(self) -> u32 {
        match self {
            Platform::Prologue => 1 << 8,
            Platform::MinilogueXd => 2 << 8,
            Platform::NutektDigital => 3 << 8,
        }
    }

    /// Decode the platform from a platform word (module bits are ignored)
    pub fn from_word(word: u32) -> Option<Self> {
        match word & 0xFF00 {
            0x0100 => Some(Platform::Prologue),
            0x0200 => Some(Platform::MinilogueXd),
            0x0300 => Some(Platform::NutektDigital),
            _ => None,
        }
    }

    /// Whether the platform routes a sub timbre through mod-fx
    pub fn has_sub_timbre(self) -> bool {
        matches!(self, Platform::Prologue)
    }
}

/// Kind of user module a unit is loaded as
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleKind {
    ModFx,
    DelFx,
    RevFx,
    Osc,
}

impl ModuleKind {
    /// Module bits of the host's platform word
    pub fn bits(self) -> u32 {
        match self {
            ModuleKind::ModFx => 1,
            ModuleKind::DelFx => 2,
            ModuleKind::RevFx => 3,
            ModuleKind::Osc => 4,
        }
    }

    pub fn from_word(word: u32) -> Option<Self> {
        match word & 0xFF {
            1 => Some(ModuleKind::ModFx),
            2 => Some(ModuleKind::DelFx),
            3 => Some(ModuleKind::RevFx),
            4 => Some(ModuleKind::Osc),
            _ => None,
        }
    }
}

/// Packed `0x00MMmmpp` API version
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct ApiVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl ApiVersion {
    /// API version the units are built against
    pub const CURRENT: ApiVersion = ApiVersion {
        major: 1,
        minor: 1,
        patch: 0,
    };

    pub fn from_word(word: u32) -> Self {
        Self {
            major: ((word >> 16) & 0xFF) as u8,
            minor: ((word >> 8) & 0xFF) as u8,
            patch: (word & 0xFF) as u8,
        }
    }

    pub fn to_word(self) -> u32 {
        ((self.major as u32) << 16) | ((self.minor as u32) << 8) | self.patch as u32
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Runtime configuration handed to a unit at INIT
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostConfig {
    pub platform: Platform,
    pub api_version: ApiVersion,
    sample_rate: f32,
    tempo_bpm: f32,
}

impl HostConfig {
    /// Validate the words a host passes to INIT
    ///
    /// Fails on an unknown platform or an unsupported API major version.
    /// A module kind in the low byte is optional, but when present it must
    /// match `expected`.
    pub fn negotiate(platform_word: u32, api_word: u32, expected: ModuleKind) -> Result<Self> {
        let Some(platform) = Platform::from_word(platform_word) else {
            bail!("unknown platform word {:#06x}", platform_word);
        };

        if platform_word & 0xFF != 0 {
            match ModuleKind::from_word(platform_word) {
                Some(kind) if kind == expected => {}
                Some(kind) => bail!("unit built as {:?} but loaded as {:?}", expected, kind),
                None => bail!("unknown module kind in platform word {:#06x}", platform_word),
            }
        }

        let api_version = ApiVersion::from_word(api_word);
        ensure!(
            api_version.major == API_MAJOR,
            "unsupported API version {} (need {}.x)",
            api_version,
            API_MAJOR
        );

        Ok(Self {
            platform,
            api_version,
            ..Self::default()
        })
    }

    /// Override the sample rate (offline rendering, desktop hosts)
    pub fn with_sample_rate(mut self, sample_rate: f32) -> Result<Self> {
        ensure!(
            sample_rate.is_finite() && sample_rate > 0.0,
            "sample rate must be positive, got {}",
            sample_rate
        );
        self.sample_rate = sample_rate;
        Ok(self)
    }

    pub fn with_tempo(mut self, tempo_bpm: f32) -> Self {
        self.set_tempo(tempo_bpm);
        self
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn sample_rate_recip(&self) -> f32 {
        1.0 / self.sample_rate
    }

    pub fn tempo_bpm(&self) -> f32 {
        self.tempo_bpm
    }

    /// Update the tempo; non-finite or negative values are ignored
    pub fn set_tempo(&mut self, tempo_bpm: f32) {
        if tempo_bpm.is_finite() && tempo_bpm >= 0.0 {
            self.tempo_bpm = tempo_bpm;
        }
    }

    /// Negotiate, falling back to defaults on failure
    ///
    /// Used at the C boundary, where INIT has no way to report an error.
    pub fn negotiate_or_default(platform_word: u32, api_word: u32, expected: ModuleKind) -> Self {
        match Self::negotiate(platform_word, api_word, expected) {
            Ok(config) => {
                log::debug!(
                    "{:?} unit initialized on {:?}, API {}, {} Hz",
                    expected,
                    config.platform,
                    config.api_version,
                    config.sample_rate
                );
                config
            }
            Err(err) => {
                log::warn!("host negotiation failed, using defaults: {:#}", err);
                Self::default()
            }
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Prologue,
            api_version: ApiVersion::CURRENT,
            sample_rate: DEFAULT_SAMPLE_RATE,
            tempo_bpm: DEFAULT_TEMPO_BPM,
        }
    }
}
