//! Bluetooth Low Energy subsystem (embedded builds only).
//!
//! Drives the Nordic SoftDevice S140 in **Peripheral** role:
//!
//! 1. **Advertising** - announces the HID service within a bounded
//!    window, then hands the stop reason to the lifecycle machine.
//! 2. **GATT server** - HID-over-GATT (report map, radial input report,
//!    haptic output report), Battery and Device Information services.
//! 3. **Runner** - owns the [`crate::device::HapticDial`] instance,
//!    executes the `LinkAction`s it returns and bridges GATT events
//!    into its observer hooks.
//!
//! Physical-input sampling lives in its own task and reaches the runner
//! through an Embassy channel, keeping all device-state mutation on one
//! logical thread.

pub mod advertising;
pub mod runner;
pub mod server;

use crate::dispatcher::{Delay, ReportSink, SinkError};
use crate::hid::dial::RADIAL_REPORT_SIZE;
use defmt::Format;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_time::{block_for, Duration};

/// Commands the input-sampling task sends to the runner.
#[derive(Clone, Copy, Format)]
pub enum DialCommand {
    Press,
    Release,
    Click,
    Rotate(i16),
    SetBatteryLevel(u8),
}

/// Channel carrying input commands into the runner task.
pub type CommandChannel = Channel<CriticalSectionRawMutex, DialCommand, 8>;

/// Channel carrying encoded reports from the dispatcher to the GATT
/// notify path.
pub type ReportChannel = Channel<CriticalSectionRawMutex, (u8, [u8; RADIAL_REPORT_SIZE]), 8>;

/// `ReportSink` backed by an Embassy channel.
///
/// The dispatcher runs inside the runner task while the live
/// `Connection` is held by the GATT loop, so reports cross a channel
/// instead of sharing the handle.  `try_send` keeps the sink
/// non-blocking; a full queue counts as a dropped report.
pub struct ChannelSink {
    tx: Sender<'static, CriticalSectionRawMutex, (u8, [u8; RADIAL_REPORT_SIZE]), 8>,
}

impl ChannelSink {
    pub fn new(
        tx: Sender<'static, CriticalSectionRawMutex, (u8, [u8; RADIAL_REPORT_SIZE]), 8>,
    ) -> Self {
        Self { tx }
    }
}

impl ReportSink for ChannelSink {
    fn notify(&mut self, report_id: u8, payload: &[u8]) -> Result<(), SinkError> {
        let mut copy = [0u8; RADIAL_REPORT_SIZE];
        copy.copy_from_slice(payload);
        self.tx.try_send((report_id, copy)).map_err(|_| SinkError)
    }
}

/// Debounce delay bound to the Embassy time driver.
///
/// Blocking by contract: the dispatcher guarantees minimum spacing
/// between sends, and the runner task is the only thing stalled.
pub struct BlockingDelay;

impl Delay for BlockingDelay {
    fn delay_ms(&mut self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}
