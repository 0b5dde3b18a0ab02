//! Unified error type for bledial.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the crate.
///
/// Connection-lifecycle failures (pairing, link drop) are *not* errors;
/// they arrive through the `on_connect`/`on_disconnect` observer hooks.
/// A send attempted while disconnected is a benign no-op, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Rotation value outside the descriptor's declared logical range.
    RotationOutOfRange(i16),

    /// Malformed inbound haptic command.
    Decode(DecodeError),

    /// The transport failed to register or start advertising.  The device
    /// stays non-discoverable until the caller invokes a retry path.
    AdvertisingFailed,
}

/// Why an inbound report could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Payload length does not match the descriptor's declared report size.
    Length { expected: usize, got: usize },
}

// Convenience conversions

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}
