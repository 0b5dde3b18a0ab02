//! SoftDevice configuration and advertising payloads.

use crate::config;
use crate::device::DeviceIdentity;
use nrf_softdevice::ble::peripheral;
use nrf_softdevice::raw;

/// Appearance: Generic Human Interface Device (HID subtype generic).
const APPEARANCE_HID_GENERIC: u16 = 0x03C0;

/// Advertisement payload: flags, HID service UUID, appearance, name.
///
/// Kept static because the SoftDevice reads it while advertising runs.
pub static ADV_DATA: &[u8] = &[
    // Flags: LE General Discoverable, BR/EDR not supported
    0x02, 0x01, 0x06,
    // Complete list of 16-bit service UUIDs: 0x1812 (HID)
    0x03, 0x03, 0x12, 0x18,
    // Appearance: 0x03C0 (Generic HID)
    0x03, 0x19, 0xC0, 0x03,
    // Complete local name: "BLE Haptic Dial"
    0x10, 0x09, b'B', b'L', b'E', b' ', b'H', b'a', b'p', b't', b'i', b'c', b' ', b'D', b'i',
    b'a', b'l',
];

/// Scan-response payload: HID service UUID again for active scanners.
pub static SCAN_DATA: &[u8] = &[0x03, 0x03, 0x12, 0x18];

/// Advertising parameters with the bounded window from the lifecycle
/// machine.  `window_ms` comes back out of `LinkAction::StartAdvertising`.
pub fn adv_config(window_ms: u32) -> peripheral::Config {
    peripheral::Config {
        // SoftDevice advertising timeout is in 10 ms units.
        timeout: Some((window_ms / 10) as u16),
        ..Default::default()
    }
}

/// SoftDevice enable parameters.
///
/// Mirrors the identity into the GAP device name; connection counts are
/// sized for one HID host plus headroom for a second bonding attempt.
pub fn softdevice_config(identity: &DeviceIdentity) -> nrf_softdevice::Config {
    nrf_softdevice::Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 2,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 64 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 2,
            central_role_count: 0,
            central_sec_count: 0,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: identity.name.as_ptr() as _,
            current_len: identity.name.len() as u16,
            max_len: identity.name.len() as u16,
            write_perm: unsafe { core::mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

/// Connection parameters requested once a host links up (1.25 ms units;
/// 6 = 7.5 ms keeps dial motion latency low).
pub fn conn_params() -> raw::ble_gap_conn_params_t {
    raw::ble_gap_conn_params_t {
        min_conn_interval: config::BLE_CONN_INTERVAL_MIN,
        max_conn_interval: config::BLE_CONN_INTERVAL_MAX,
        slave_latency: config::BLE_SLAVE_LATENCY,
        conn_sup_timeout: config::BLE_SUP_TIMEOUT,
    }
}
