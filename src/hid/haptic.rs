//! Haptic feedback report (Report ID 2) - host to device.
//!
//! The descriptor exposes a Simple Haptic Controller with two fixed
//! waveforms (ordinal 3 = press, ordinal 4 = release).  The host drives
//! the actuator through the output report; the feature report carries
//! the static capability values it may read back.
//!
//! Output report layout (5 bytes):
//! ```text
//! Byte 0:   Intensity (0..127)
//! Byte 1:   Repeat Count
//! Byte 2:   Retrigger Period
//! Byte 3-4: Manual Trigger, 16-bit LE waveform usage
//! ```
//!
//! Driving the actuator itself is the haptic driver's job; this module
//! only turns bytes into fields.

use crate::error::DecodeError;

/// Output report size in bytes (intensity + repeat + retrigger + trigger).
pub const HAPTIC_OUTPUT_REPORT_SIZE: usize = 5;

/// Feature report size in bytes (waveform list, duration list, auto
/// trigger + associated control, intensity, repeat, retrigger, cutoff).
pub const HAPTIC_FEATURE_REPORT_SIZE: usize = 15;

/// Haptics usage of the press waveform (Waveform List ordinal 3).
pub const WAVEFORM_PRESS: u16 = 0x1003;

/// Haptics usage of the release waveform (Waveform List ordinal 4).
pub const WAVEFORM_RELEASE: u16 = 0x1004;

/// Usage the auto-trigger is bound to (Generic Desktop / Dial).
pub const AUTO_TRIGGER_ASSOCIATED_CONTROL: u32 = 0x0001_0037;

/// A decoded haptic output report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HapticCommand {
    /// Playback intensity, 0..127.
    pub intensity: u8,
    /// How many times the waveform repeats after the initial playback.
    pub repeat_count: u8,
    /// Delay between repeats.
    pub retrigger_period: u8,
    /// Waveform usage to fire immediately; 0 means none.
    pub manual_trigger: u16,
}

impl HapticCommand {
    /// Decode an inbound output report.
    ///
    /// The length must match the descriptor's declared output-report
    /// size exactly; hosts never send partial reports, so anything else
    /// is a framing error.
    pub fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() != HAPTIC_OUTPUT_REPORT_SIZE {
            return Err(DecodeError::Length {
                expected: HAPTIC_OUTPUT_REPORT_SIZE,
                got: data.len(),
            });
        }
        Ok(Self {
            intensity: data[0],
            repeat_count: data[1],
            retrigger_period: data[2],
            manual_trigger: u16::from_le_bytes([data[3], data[4]]),
        })
    }

    /// Whether the host asked for an immediate waveform playback.
    pub fn is_manual_trigger(&self) -> bool {
        self.manual_trigger != 0
    }
}

/// Static feature-report content the host may read.
///
/// Everything except intensity/repeat/retrigger/cutoff is constant in
/// the descriptor, so encoding defaults is all a read handler needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HapticFeatureReport {
    /// Waveform durations for ordinals 3 and 4 (ms).
    pub durations: [u8; 2],
    /// Waveform usage fired automatically on dial motion; 0x1000 = none.
    pub auto_trigger: u16,
    pub intensity: u8,
    pub repeat_count: u8,
    pub retrigger_period: u8,
    /// Longest playback the actuator honours (ms).
    pub waveform_cutoff_time: u16,
}

impl Default for HapticFeatureReport {
    fn default() -> Self {
        Self {
            durations: [0, 0],
            auto_trigger: 0x1000, // Waveform None
            intensity: 0x7F,
            repeat_count: 0,
            retrigger_period: 0,
            waveform_cutoff_time: 0,
        }
    }
}

impl HapticFeatureReport {
    /// Serialise in the descriptor's declared field order.
    /// Returns the number of bytes written (always 15).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < HAPTIC_FEATURE_REPORT_SIZE {
            return 0;
        }
        buf[0] = 3; // Waveform List ordinal 3 (constant)
        buf[1] = 4; // Waveform List ordinal 4 (constant)
        buf[2] = self.durations[0];
        buf[3] = self.durations[1];
        buf[4..6].copy_from_slice(&self.auto_trigger.to_le_bytes());
        buf[6..10].copy_from_slice(&AUTO_TRIGGER_ASSOCIATED_CONTROL.to_le_bytes());
        buf[10] = self.intensity;
        buf[11] = self.repeat_count;
        buf[12] = self.retrigger_period;
        buf[13..15].copy_from_slice(&self.waveform_cutoff_time.to_le_bytes());
        HAPTIC_FEATURE_REPORT_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_output_report() {
        let data = [0x40, 0x02, 0x0A, 0x03, 0x10]; // trigger = 0x1003
        let cmd = HapticCommand::decode(&data).unwrap();
        assert_eq!(cmd.intensity, 0x40);
        assert_eq!(cmd.repeat_count, 2);
        assert_eq!(cmd.retrigger_period, 10);
        assert_eq!(cmd.manual_trigger, WAVEFORM_PRESS);
        assert!(cmd.is_manual_trigger());
    }

    #[test]
    fn decode_rejects_wrong_length() {
        assert_eq!(
            HapticCommand::decode(&[0x40, 0x02]),
            Err(DecodeError::Length {
                expected: 5,
                got: 2
            })
        );
        assert!(HapticCommand::decode(&[0; 6]).is_err());
        assert!(HapticCommand::decode(&[]).is_err());
    }

    #[test]
    fn no_trigger_when_field_is_zero() {
        let cmd = HapticCommand::decode(&[0x7F, 0, 0, 0, 0]).unwrap();
        assert!(!cmd.is_manual_trigger());
    }

    #[test]
    fn feature_report_defaults_serialize() {
        let mut buf = [0u8; HAPTIC_FEATURE_REPORT_SIZE];
        let written = HapticFeatureReport::default().serialize(&mut buf);
        assert_eq!(written, HAPTIC_FEATURE_REPORT_SIZE);
        // Waveform ordinals are constants from the descriptor.
        assert_eq!(&buf[..2], &[3, 4]);
        // Auto trigger defaults to Waveform None.
        assert_eq!(u16::from_le_bytes([buf[4], buf[5]]), 0x1000);
        // Associated control is the Dial usage.
        assert_eq!(
            u32::from_le_bytes([buf[6], buf[7], buf[8], buf[9]]),
            AUTO_TRIGGER_ASSOCIATED_CONTROL
        );
    }

    #[test]
    fn feature_report_buffer_too_small() {
        let mut buf = [0u8; 8];
        assert_eq!(HapticFeatureReport::default().serialize(&mut buf), 0);
    }
}
