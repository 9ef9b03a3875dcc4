use std::fmt::{self, Display};
use std::str::FromStr;

use hidapi::HidError;

pub type Result<T> = std::result::Result<T, PulsarError>;

#[derive(thiserror::Error)]
pub enum PulsarError {
    #[error("failed to initialize hidapi: {_0}")]
    TransportInit(HidError),
    #[error("xanova pulsar xk400 is not present")]
    DeviceNotFound,
    #[error("failed to open device: {_0}")]
    DeviceOpen(String),
    #[error("failed to write to device: {_0}")]
    TransportWrite(HidError),
    #[error("{_0}")]
    InvalidMode(String),
}

impl fmt::Debug for PulsarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Backlight effect, written little-endian into bytes 6 and 7.
///
/// The codes carry no relation to the direction or style of the effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BacklightMode {
    Off = 0x0000,
    Breathing = 0x0200,
    Static = 0x0100,
    AlternateWave = 0x0402,
    ScanWave = 0x0403,
    WaveRight = 0x0404,
    WaveDown = 0x0407,
    RipplingLeft = 0x0701,
    RipplingRight = 0x0700,
    Fireworks = 0x0600,
    Star = 0x0A00,
    Boom = 0x0B00,
}

impl BacklightMode {
    pub const ALL: [Self; 12] = [
        Self::Off,
        Self::Breathing,
        Self::Static,
        Self::AlternateWave,
        Self::ScanWave,
        Self::WaveRight,
        Self::WaveDown,
        Self::RipplingLeft,
        Self::RipplingRight,
        Self::Fireworks,
        Self::Star,
        Self::Boom,
    ];

    pub const OPTIONS: &'static str = "[ off, breathing, static, alternatewave, scanwave, wave-right, wave-down, rippling-left, rippling-right, fireworks, star, boom ]";

    /// Raw firmware code for the effect
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Breathing => "breathing",
            Self::Static => "static",
            Self::AlternateWave => "alternatewave",
            Self::ScanWave => "scanwave",
            Self::WaveRight => "wave-right",
            Self::WaveDown => "wave-down",
            Self::RipplingLeft => "rippling-left",
            Self::RipplingRight => "rippling-right",
            Self::Fireworks => "fireworks",
            Self::Star => "star",
            Self::Boom => "boom",
        }
    }
}

impl Display for BacklightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BacklightMode {
    type Err = PulsarError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| {
                PulsarError::InvalidMode(format!(
                    "invalid backlight mode '{s}', must be one of: {}",
                    Self::OPTIONS
                ))
            })
    }
}

/// Keylight effect, written into byte 7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeylightMode {
    Off = 0,
    Fade = 1,
    Hexagon = 2,
    Ripple = 3,
    // no effect is known at 4
    RunOutSig = 5,
    RunInSig = 6,
    RunIn = 7,
}

impl KeylightMode {
    pub const ALL: [Self; 7] = [
        Self::Off,
        Self::Fade,
        Self::Hexagon,
        Self::Ripple,
        Self::RunOutSig,
        Self::RunInSig,
        Self::RunIn,
    ];

    pub const OPTIONS: &'static str =
        "[ off, fade, hexagon, ripple, runoutsig, runinsig, runin ]";

    /// Raw firmware code for the effect
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Fade => "fade",
            Self::Hexagon => "hexagon",
            Self::Ripple => "ripple",
            Self::RunOutSig => "runoutsig",
            Self::RunInSig => "runinsig",
            Self::RunIn => "runin",
        }
    }
}

impl Display for KeylightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeylightMode {
    type Err = PulsarError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == s)
            .ok_or_else(|| {
                PulsarError::InvalidMode(format!(
                    "invalid keylight mode '{s}', must be one of: {}",
                    Self::OPTIONS
                ))
            })
    }
}

/// A single, already validated lighting command
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeRequest {
    Backlight { mode: BacklightMode, speed: u8 },
    Keylight { mode: KeylightMode, speed: u8 },
    Brightness { level: u8 },
}

impl Display for ModeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backlight { mode, speed } => write!(f, "backlight to {mode} (speed {speed})"),
            Self::Keylight { mode, speed } => write!(f, "keylight to {mode} (speed {speed})"),
            Self::Brightness { level } => write!(f, "brightness to {level}"),
        }
    }
}
