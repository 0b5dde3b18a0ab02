//! BLE HID radial controller peripheral.
//!
//! The library is the device-side protocol core: report descriptor,
//! state + wire codecs, connection lifecycle and report dispatch.  It
//! is `no_std` and transport-free, so everything here runs in host
//! unit tests (`cargo test`).
//!
//! The embedded binary (`src/main.rs`, feature `embedded`) binds this
//! core to the Nordic SoftDevice in peripheral role: GATT HID service,
//! extended advertising and system-off sleep.
//!
//! ```text
//! physical input ──> HapticDial ──> ReportDispatcher ──> ReportSink (BLE notify)
//!                        │
//! transport events ──> on_connect / on_disconnect / on_adv_stopped
//! ```

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "embedded")]
pub mod ble;
pub mod config;
pub mod device;
pub mod dispatcher;
pub mod error;
pub mod hid;
pub mod lifecycle;

pub use device::{DeviceIdentity, DialConfig, HapticDial};
pub use error::{DecodeError, Error};
