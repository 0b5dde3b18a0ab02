//! Report dispatcher - decides when a radial report actually goes out.
//!
//! The transport and the time source are injected as traits so the
//! dispatcher stays host-testable and the embedded wiring can bind the
//! SoftDevice notification call and an Embassy blocking delay.
//!
//! Contract: no two transmissions are separated by less than the
//! configured debounce interval, enforced by a blocking delay *after*
//! each send.  Callers driving this from a transport callback must
//! budget for that stall (up to `debounce_ms` per report).

use crate::hid::descriptor::RADIAL_CONTROLLER_REPORT_ID;
use crate::hid::dial::{DialState, RADIAL_REPORT_SIZE};

/// The send half of the transport: pushes one input report to the host.
pub trait ReportSink {
    /// Deliver `payload` as a notification for `report_id`.
    ///
    /// An `Err` means the link dropped mid-send; the report is gone but
    /// device state is preserved.
    fn notify(&mut self, report_id: u8, payload: &[u8]) -> Result<(), SinkError>;
}

/// Transport-level send failure.  Carries no detail: the disconnect
/// callback that follows is the authoritative signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SinkError;

/// Blocking delay provider for the debounce interval.
pub trait Delay {
    fn delay_ms(&mut self, ms: u32);
}

/// Rate-limited dispatcher for radial input reports.
pub struct ReportDispatcher<S: ReportSink, D: Delay> {
    sink: S,
    delay: D,
    debounce_ms: u32,
    connected: bool,
}

impl<S: ReportSink, D: Delay> ReportDispatcher<S, D> {
    pub const fn new(sink: S, delay: D, debounce_ms: u32) -> Self {
        Self {
            sink,
            delay,
            debounce_ms,
            connected: false,
        }
    }

    /// Track the link state; the device object mirrors its lifecycle
    /// machine into this flag on connect/disconnect callbacks.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Encode the current state and push it to the host.
    ///
    /// Skipped silently while disconnected: state is not ours to roll
    /// back, and a reconnecting host picks up the latest value on its
    /// next notify cycle.  Returns whether a report was transmitted.
    pub fn dispatch(&mut self, state: &DialState) -> bool {
        if !self.connected {
            return false;
        }

        let mut buf = [0u8; RADIAL_REPORT_SIZE];
        state.encode().serialize(&mut buf);

        let sent = match self.sink.notify(RADIAL_CONTROLLER_REPORT_ID, &buf) {
            Ok(()) => true,
            Err(SinkError) => {
                // Report dropped; the disconnect callback will follow.
                #[cfg(feature = "defmt")]
                defmt::warn!("radial report dropped (link lost mid-send)");
                false
            }
        };

        self.delay.delay_ms(self.debounce_ms);
        sent
    }
}

#[cfg(test)]
pub(crate) mod testkit {
    //! Shared mock sink/delay for dispatcher and device tests.

    use super::*;
    use heapless::Vec;

    /// Records every notified payload; can be told to fail sends.
    #[derive(Default)]
    pub struct MockSink {
        pub sent: Vec<(u8, [u8; RADIAL_REPORT_SIZE]), 16>,
        pub fail_next: bool,
    }

    impl ReportSink for &mut MockSink {
        fn notify(&mut self, report_id: u8, payload: &[u8]) -> Result<(), SinkError> {
            if self.fail_next {
                self.fail_next = false;
                return Err(SinkError);
            }
            let mut copy = [0u8; RADIAL_REPORT_SIZE];
            copy.copy_from_slice(payload);
            self.sent.push((report_id, copy)).unwrap();
            Ok(())
        }
    }

    /// Accumulates requested delays so tests can assert spacing.
    #[derive(Default)]
    pub struct MockDelay {
        pub slept_ms: u32,
        pub calls: u32,
    }

    impl Delay for &mut MockDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.slept_ms += ms;
            self.calls += 1;
        }
    }
}
