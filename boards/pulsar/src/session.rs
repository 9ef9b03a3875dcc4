//! Lifecycle of the HID connection to the keyboard's control interface.
//!
//! A [`DeviceSession`] only exists while the device is open. Dropping it (or calling
//! [`DeviceSession::close`]) closes the device handle and then drops the backend, on
//! every exit path.
//!
//! With hidapi the backend only holds the enumerated device list. hidapi-rs initializes
//! the C library once per process and never calls `hid_exit`, so the process-wide
//! context lives until the process exits.

use std::ffi::{CStr, CString};

use hidapi::{HidApi, HidDevice, HidResult};
use tracing::{debug, info, warn};

use crate::abi::Packet;
use crate::consts::{CONTROL_INTERFACE, PULSAR_PRODUCT_ID, PULSAR_VENDOR_ID};
use crate::types::{PulsarError, Result};

/// Device exposed by the transport during enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub path: CString,
    pub interface_number: i32,
}

/// Handle that accepts feature reports
pub trait FeatureReport {
    fn send_feature_report(&self, data: &[u8]) -> HidResult<()>;
}

/// Handle to the HID subsystem, dropped after the device is closed.
///
/// For [`HidApi`] dropping only frees the device list; the C library stays
/// initialized for the rest of the process.
pub trait Backend {
    type Device: FeatureReport;

    /// List every device matching the vendor and product id
    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> HidResult<Vec<Candidate>>;

    /// Open a device by its platform path
    fn open_path(&self, path: &CStr) -> HidResult<Self::Device>;
}

impl FeatureReport for HidDevice {
    #[inline(always)]
    fn send_feature_report(&self, data: &[u8]) -> HidResult<()> {
        HidDevice::send_feature_report(self, data)
    }
}

impl Backend for HidApi {
    type Device = HidDevice;

    fn enumerate(&mut self, vendor_id: u16, product_id: u16) -> HidResult<Vec<Candidate>> {
        self.reset_devices()?;
        self.add_devices(vendor_id, product_id)?;
        Ok(self
            .device_list()
            .map(|d| Candidate {
                path: d.path().to_owned(),
                interface_number: d.interface_number(),
            })
            .collect())
    }

    #[inline(always)]
    fn open_path(&self, path: &CStr) -> HidResult<HidDevice> {
        HidApi::open_path(self, path)
    }
}

/// Exclusive, open handle to the keyboard's vendor control interface
pub struct DeviceSession<B: Backend = HidApi> {
    // field order matters: the device is closed before the backend is dropped
    device: B::Device,
    _backend: B,
}

impl DeviceSession<HidApi> {
    /// Initialize hidapi, then find and open the control interface
    pub fn open() -> Result<Self> {
        Self::open_with(HidApi::new)
    }
}

impl<B: Backend> DeviceSession<B> {
    /// Initialize the subsystem with `init`, then find and open the control interface.
    ///
    /// On failure after initialization, the backend is dropped before returning.
    pub fn open_with(init: impl FnOnce() -> HidResult<B>) -> Result<Self> {
        let mut backend = init().map_err(PulsarError::TransportInit)?;

        let candidates = match backend.enumerate(PULSAR_VENDOR_ID, PULSAR_PRODUCT_ID) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("device enumeration failed: {e}");
                return Err(PulsarError::DeviceNotFound);
            },
        };
        debug!(
            "found {} interfaces for {PULSAR_VENDOR_ID:04x}:{PULSAR_PRODUCT_ID:04x}: {candidates:?}",
            candidates.len()
        );
        if candidates.is_empty() {
            return Err(PulsarError::DeviceNotFound);
        }

        let candidate = candidates
            .iter()
            .find(|c| c.interface_number == CONTROL_INTERFACE)
            .ok_or_else(|| {
                PulsarError::DeviceOpen(format!("no interface {CONTROL_INTERFACE} exposed"))
            })?;
        let device = backend
            .open_path(&candidate.path)
            .map_err(|e| PulsarError::DeviceOpen(e.to_string()))?;
        info!("opened device at {:?}", candidate.path);

        Ok(Self {
            device,
            _backend: backend,
        })
    }

    /// Write a feature report. Nothing is read back.
    pub fn send(&self, packet: &Packet) -> Result<()> {
        debug!("sending feature report {:02x?}", &packet[..]);
        self.device
            .send_feature_report(packet)
            .map_err(PulsarError::TransportWrite)
    }

    /// Close the device and drop the backend
    pub fn close(self) {
        drop(self)
    }
}

// Only logs. Closing happens in the field drops that follow, in declaration order
// (see the note on `DeviceSession::device`), so keep `device` above `_backend`.
impl<B: Backend> Drop for DeviceSession<B> {
    fn drop(&mut self) {
        debug!("closing device");
    }
}
