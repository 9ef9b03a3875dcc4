//! High level hidapi abstraction for the Galax Xanova Pulsar XK400 lighting controls.
//!
//! Commands are 65-byte feature reports sent to the keyboard's vendor interface
//! (interface 2). The protocol is write-only; nothing is read back from the board.

use hidapi::HidApi;
use tracing::debug;

pub use session::{Backend, Candidate, DeviceSession, FeatureReport};
pub use types::{BacklightMode, KeylightMode, ModeRequest, PulsarError, Result};

pub mod abi;
pub mod checksum;
pub mod session;
pub mod types;

pub mod consts {
    pub const PULSAR_VENDOR_ID: u16 = 0x1024;
    pub const PULSAR_PRODUCT_ID: u16 = 0x2020;
    /// Vendor control interface, separate from the keyboard's input interfaces
    pub const CONTROL_INTERFACE: i32 = 2;

    /// Feature report length including the report id
    pub const PACKET_LEN: usize = 65;
    pub const PAYLOAD_OFFSET: usize = 4;
    pub const CHECKSUM_OFFSET: usize = 63;
}

/// High level abstraction for managing a Pulsar keyboard
pub struct Pulsar<B: Backend = HidApi> {
    session: DeviceSession<B>,
}

impl Pulsar {
    /// Find and open the device for modifications
    pub fn open() -> Result<Self> {
        Ok(Self {
            session: DeviceSession::open()?,
        })
    }
}

impl<B: Backend> Pulsar<B> {
    /// Wrap an already open session
    pub fn from_session(session: DeviceSession<B>) -> Self {
        Self { session }
    }

    /// Set the backlight effect. Speed runs from 0 (slowest) to 255, and is ignored by some effects.
    #[inline(always)]
    pub fn set_backlight(&mut self, mode: BacklightMode, speed: u8) -> Result<()> {
        self.session.send(&abi::backlight(mode, speed))
    }

    /// Set the keylight effect. Speed runs from 0 (slowest) to 255, and is ignored by some effects.
    #[inline(always)]
    pub fn set_keylight(&mut self, mode: KeylightMode, speed: u8) -> Result<()> {
        self.session.send(&abi::keylight(mode, speed))
    }

    /// Set the backlight brightness
    #[inline(always)]
    pub fn set_brightness(&mut self, level: u8) -> Result<()> {
        self.session.send(&abi::brightness(level))
    }

    /// Encode and send a single request
    pub fn apply(&mut self, request: ModeRequest) -> Result<()> {
        debug!("applying {request}");
        self.session.send(&abi::encode(request))
    }

    /// Close the device
    pub fn close(self) {
        self.session.close()
    }
}
