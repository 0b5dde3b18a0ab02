//! Radial controller input report - press button + dial rotation.
//!
//! Layout (2 bytes, little-endian 16-bit word):
//! ```text
//! Bit 0:     Button state (1 = pressed)
//! Bits 1-15: Rotation, 15-bit two's complement, tenths of a degree
//! ```
//!
//! The 15-bit field matches the descriptor's Report Size (15) and its
//! declared logical range -3600..=3600, so values are packed and
//! sign-extended explicitly rather than through struct layout tricks.

use crate::error::Error;

/// Radial report size in bytes.
pub const RADIAL_REPORT_SIZE: usize = 2;

/// Smallest rotation the descriptor declares (tenths of a degree).
pub const ROTATION_MIN: i16 = -3600;

/// Largest rotation the descriptor declares (tenths of a degree).
pub const ROTATION_MAX: i16 = 3600;

/// Wire form of one radial-controller input report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadialReport {
    /// Button state (bit 0 on the wire).
    pub button: bool,
    /// Rotation in tenths of a degree (bits 1-15 on the wire).
    pub rotation: i16,
}

impl RadialReport {
    /// Serialise into a byte slice for BLE notification.
    /// Returns the number of bytes written (always 2).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < RADIAL_REPORT_SIZE {
            return 0;
        }
        let word = (self.button as u16) | ((self.rotation as u16 & 0x7FFF) << 1);
        buf[..RADIAL_REPORT_SIZE].copy_from_slice(&word.to_le_bytes());
        RADIAL_REPORT_SIZE
    }

    /// Parse a 2-byte report, sign-extending the 15-bit rotation field.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < RADIAL_REPORT_SIZE {
            return None;
        }
        let word = u16::from_le_bytes([data[0], data[1]]);
        // Shift left then arithmetic-shift right to sign-extend bit 15
        // of the field into the full i16.
        let rotation = ((word & 0xFFFE) as i16) >> 1;
        Some(Self {
            button: word & 0x0001 != 0,
            rotation,
        })
    }
}

/// Mutable dial state, owned by the device object.
///
/// Single-owner by design: the transport delivers its callbacks
/// serially, so no locking is needed here.  A multi-threaded embedder
/// must serialise mutations externally.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialState {
    button_pressed: bool,
    rotation: i16,
}

impl DialState {
    pub const fn new() -> Self {
        Self {
            button_pressed: false,
            rotation: 0,
        }
    }

    /// Return state to its initial reset values.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Update the button and report whether the value actually changed.
    /// The dispatcher uses the return value to suppress duplicate sends.
    pub fn set_button(&mut self, pressed: bool) -> bool {
        let changed = pressed != self.button_pressed;
        self.button_pressed = pressed;
        changed
    }

    /// Apply a rotation delta (tenths of a degree).
    ///
    /// The resulting value must stay inside the descriptor's declared
    /// logical range; anything else is rejected without mutating state,
    /// since the host would discard such a report anyway.
    pub fn rotate(&mut self, delta: i16) -> Result<(), Error> {
        let next = self.rotation.checked_add(delta);
        match next {
            Some(v) if (ROTATION_MIN..=ROTATION_MAX).contains(&v) => {
                self.rotation = v;
                Ok(())
            }
            Some(v) => Err(Error::RotationOutOfRange(v)),
            None => Err(Error::RotationOutOfRange(self.rotation)),
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.button_pressed
    }

    pub fn rotation(&self) -> i16 {
        self.rotation
    }

    /// Snapshot the current state as a wire report.  Pure; no side effects.
    pub fn encode(&self) -> RadialReport {
        RadialReport {
            button: self.button_pressed,
            rotation: self.rotation,
        }
    }
}
