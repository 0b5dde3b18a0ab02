//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters and protocol constants live here so they can
//! be tuned in one place.  Device identity (name, VID/PID) is carried
//! by [`crate::device::DeviceIdentity`] instead of process-wide state;
//! the defaults below feed its `Default` impl.

// Device identity defaults

/// Advertised device name.
pub const DEVICE_NAME: &str = "BLE Haptic Dial";

/// Manufacturer string exposed via the Device Information service.
pub const DEVICE_MANUFACTURER: &str = "bledial";

/// Vendor ID reported in the PnP ID characteristic.
/// Matches the Surface Dial so hosts apply their radial-controller driver.
pub const VENDOR_ID: u16 = 0x045E;

/// Product ID reported in the PnP ID characteristic.
pub const PRODUCT_ID: u16 = 0x0905;

/// Firmware version reported in the PnP ID characteristic.
pub const VERSION: u16 = 0x0001;

/// Battery level reported until the application measures a real one (percent).
pub const DEFAULT_BATTERY_LEVEL: u8 = 100;

// BLE

/// Advertising window before the device gives up waiting for a host (ms).
pub const ADV_WINDOW_MS: u32 = 5_000;

/// Deep-sleep duration after the advertising window expires with no
/// connection (seconds).  The device expects a timer wakeup afterwards.
pub const ADV_TIMEOUT_SLEEP_SECS: u32 = 20;

/// Whether an expired advertising window sends the device to sleep at all.
/// When disabled the lifecycle machine parks in `Idle` and waits for the
/// caller to restart advertising.
pub const SLEEP_ON_ADV_TIMEOUT: bool = true;

/// BLE connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for HID).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

// Report dispatch

/// Minimum spacing between two input-report transmissions (ms).
/// Protects the host's input queue and the radio link from saturation.
pub const DEBOUNCE_MS: u32 = 10;
