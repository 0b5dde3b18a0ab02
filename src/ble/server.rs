//! GATT server - HID-over-GATT, Battery and Device Information services.
//!
//! The HID service is registered by hand through the `ServiceBuilder`
//! so every Report characteristic carries a Report Reference descriptor
//! (0x2908): the three reports share the 0x2A4D characteristic UUID and
//! the host's HID driver needs the (report ID, type) pairs to tell them
//! apart.  Battery and Device Information have no such descriptors and
//! use the `gatt_service` macro.  Report payload layout is owned by
//! [`crate::hid`]; this module only moves bytes.

use crate::device::DeviceIdentity;
use crate::hid::descriptor::{
    DIAL_REPORT_DESCRIPTOR, HAPTIC_FEATURE_REPORT_REFERENCE, HAPTIC_OUTPUT_REPORT_REFERENCE,
    HID_INFORMATION, RADIAL_REPORT_REFERENCE,
};
use crate::hid::dial::RADIAL_REPORT_SIZE;
use crate::hid::haptic::{
    HapticFeatureReport, HAPTIC_FEATURE_REPORT_SIZE, HAPTIC_OUTPUT_REPORT_SIZE,
};
use defmt::info;
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{
    self, NotifyValueError, RegisterError, Service, SetValueError,
};
use nrf_softdevice::ble::{Connection, Uuid};
use nrf_softdevice::Softdevice;

const HID_SERVICE: Uuid = Uuid::new_16(0x1812);
const HID_INFORMATION_CHAR: Uuid = Uuid::new_16(0x2a4a);
const REPORT_MAP: Uuid = Uuid::new_16(0x2a4b);
const HID_CONTROL_POINT: Uuid = Uuid::new_16(0x2a4c);
const HID_REPORT: Uuid = Uuid::new_16(0x2a4d);
const REPORT_REFERENCE: Uuid = Uuid::new_16(0x2908);

/// HID service (0x1812), attribute handles only; values live in the
/// SoftDevice table.
pub struct HidService {
    radial_value: u16,
    radial_cccd: u16,
    haptic_value: u16,
    haptic_feature: u16,
    control_point: u16,
}

impl HidService {
    pub fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        let mut sb = ServiceBuilder::new(sd, HID_SERVICE)?;

        // Report Map - the radial controller descriptor, read once by
        // the host.
        let report_map = sb.add_characteristic(
            REPORT_MAP,
            Attribute::new(DIAL_REPORT_DESCRIPTOR),
            Metadata::new(Properties::new().read()),
        )?;
        let _ = report_map.build();

        let hid_info = sb.add_characteristic(
            HID_INFORMATION_CHAR,
            Attribute::new(&HID_INFORMATION),
            Metadata::new(Properties::new().read()),
        )?;
        let _ = hid_info.build();

        // Radial input report (ID 1), pushed via notification.
        let mut radial = sb.add_characteristic(
            HID_REPORT,
            Attribute::new(&[0u8; RADIAL_REPORT_SIZE]),
            Metadata::new(Properties::new().read().notify()),
        )?;
        radial.add_descriptor(REPORT_REFERENCE, Attribute::new(&RADIAL_REPORT_REFERENCE))?;
        let radial = radial.build();

        // Haptic output report (ID 2), written by the host.
        let mut haptic = sb.add_characteristic(
            HID_REPORT,
            Attribute::new(&[0u8; HAPTIC_OUTPUT_REPORT_SIZE]),
            Metadata::new(Properties::new().read().write().write_without_response()),
        )?;
        haptic.add_descriptor(
            REPORT_REFERENCE,
            Attribute::new(&HAPTIC_OUTPUT_REPORT_REFERENCE),
        )?;
        let haptic = haptic.build();

        // Haptic feature report (ID 2): capability values the host
        // reads back, seeded with the descriptor defaults.
        let mut feature_defaults = [0u8; HAPTIC_FEATURE_REPORT_SIZE];
        HapticFeatureReport::default().serialize(&mut feature_defaults);
        let mut feature = sb.add_characteristic(
            HID_REPORT,
            Attribute::new(&feature_defaults),
            Metadata::new(Properties::new().read()),
        )?;
        feature.add_descriptor(
            REPORT_REFERENCE,
            Attribute::new(&HAPTIC_FEATURE_REPORT_REFERENCE),
        )?;
        let feature = feature.build();

        // HID Control Point: suspend / exit-suspend commands.
        let control_point = sb.add_characteristic(
            HID_CONTROL_POINT,
            Attribute::new(&[0u8]),
            Metadata::new(Properties::new().write_without_response()),
        )?;
        let control_point = control_point.build();

        let _service = sb.build();

        Ok(Self {
            radial_value: radial.value_handle,
            radial_cccd: radial.cccd_handle,
            haptic_value: haptic.value_handle,
            haptic_feature: feature.value_handle,
            control_point: control_point.value_handle,
        })
    }

    /// Push one radial input report to the connected host.
    pub fn radial_report_notify(
        &self,
        conn: &Connection,
        payload: &[u8; RADIAL_REPORT_SIZE],
    ) -> Result<(), NotifyValueError> {
        gatt_server::notify_value(conn, self.radial_value, payload)
    }

    /// Refresh the readable feature report after an output-report write.
    pub fn haptic_feature_set(
        &self,
        sd: &Softdevice,
        value: &[u8; HAPTIC_FEATURE_REPORT_SIZE],
    ) -> Result<(), SetValueError> {
        gatt_server::set_value(sd, self.haptic_feature, value)
    }
}

pub enum HidServiceEvent {
    HapticReportWrite([u8; HAPTIC_OUTPUT_REPORT_SIZE]),
    RadialReportCccdWrite { notifications: bool },
    ControlPointWrite(u8),
}

impl Service for HidService {
    type Event = HidServiceEvent;

    fn on_write(&self, handle: u16, data: &[u8]) -> Option<Self::Event> {
        if handle == self.haptic_value {
            // Writes shorter than the attribute are rejected by the
            // stack, so the conversion only guards against oversize.
            data.try_into().ok().map(HidServiceEvent::HapticReportWrite)
        } else if handle == self.radial_cccd && !data.is_empty() {
            Some(HidServiceEvent::RadialReportCccdWrite {
                notifications: data[0] & 0x01 != 0,
            })
        } else if handle == self.control_point && !data.is_empty() {
            Some(HidServiceEvent::ControlPointWrite(data[0]))
        } else {
            None
        }
    }
}

/// Battery service (0x180F).
#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

/// Device Information service (0x180A).
#[nrf_softdevice::gatt_service(uuid = "180a")]
pub struct DeviceInformationService {
    #[characteristic(uuid = "2a29", read)]
    pub manufacturer_name: [u8; 16],

    /// PnP ID: vendor source, VID, PID, product version.
    #[characteristic(uuid = "2a50", read)]
    pub pnp_id: [u8; 7],
}

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub hid: HidService,
    pub bas: BatteryService,
    pub dis: DeviceInformationService,
}

impl Server {
    /// Build the attribute table and seed the identity characteristics.
    /// The HID characteristics are seeded at registration.
    pub fn start(sd: &mut Softdevice, identity: &DeviceIdentity) -> Self {
        let server = Server::new(sd).unwrap();

        let mut manufacturer = [0u8; 16];
        let bytes = identity.manufacturer.as_bytes();
        let n = bytes.len().min(manufacturer.len());
        manufacturer[..n].copy_from_slice(&bytes[..n]);
        server.dis.manufacturer_name_set(&manufacturer).unwrap();

        let mut pnp = [0u8; 7];
        pnp[0] = 0x02; // USB Implementer's Forum assigned VID
        pnp[1..3].copy_from_slice(&identity.vendor_id.to_le_bytes());
        pnp[3..5].copy_from_slice(&identity.product_id.to_le_bytes());
        pnp[5..7].copy_from_slice(&identity.version.to_le_bytes());
        server.dis.pnp_id_set(&pnp).unwrap();

        info!("GATT server ready ({} descriptor bytes)", DIAL_REPORT_DESCRIPTOR.len());
        server
    }

    /// Push one radial input report to the connected host.
    pub fn notify_radial(
        &self,
        conn: &Connection,
        payload: &[u8; RADIAL_REPORT_SIZE],
    ) -> Result<(), NotifyValueError> {
        self.hid.radial_report_notify(conn, payload)
    }

    /// Mirror the application battery level into the battery service.
    pub fn set_battery_level(&self, conn: Option<&Connection>, level: u8) {
        let _ = self.bas.battery_level_set(&level);
        if let Some(conn) = conn {
            let _ = self.bas.battery_level_notify(conn, &level);
        }
    }
}
