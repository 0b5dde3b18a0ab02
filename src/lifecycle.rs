//! Connection lifecycle state machine.
//!
//! Tracks the advertising / connection / sleep cycle of the peripheral
//! and tells the transport wiring what to do next.  Pure logic: every
//! external effect (start advertising, power down) is returned as a
//! [`LinkAction`] for the caller to execute, which keeps the machine
//! host-testable.
//!
//! The subtle case is an expiring advertising window.  The transport
//! reports *why* advertising stopped; reason 0 means a host is mid-
//! handshake, and powering down at that point would abort the pairing.
//! Only a genuine timeout (or any other stop reason) may sleep.

/// Lifecycle states of the link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// Not started, or externally woken and waiting for `start`.
    Idle,
    /// Broadcasting presence within a bounded window.
    Advertising,
    /// At least one host holds a connection.
    Connected,
    /// Advertising expired with no interest; sleep decided but not yet
    /// entered.
    SleepPending,
    /// Powered down until externally woken (terminal for this wake cycle).
    Asleep,
}

/// Why the transport stopped advertising.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdvStopReason {
    /// A host is mid-handshake (stop reason code 0).  Not a timeout.
    ConnectionInProgress,
    /// The advertising window elapsed with no connection attempt.
    Timeout,
    /// Any other transport-specific stop code.
    Other(u8),
}

impl AdvStopReason {
    /// Map the transport's raw stop code.  0 is reserved for "client
    /// connecting" in the observed protocol.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => AdvStopReason::ConnectionInProgress,
            1 => AdvStopReason::Timeout,
            other => AdvStopReason::Other(other),
        }
    }
}

/// Effect the caller must carry out after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkAction {
    /// Nothing to do.
    None,
    /// Begin advertising with the given bounded window.
    StartAdvertising { window_ms: u32 },
    /// Enter low-power sleep for the given duration, then expect an
    /// external wake.
    EnterSleep { duration_secs: u32 },
}

/// The lifecycle machine itself.
///
/// `sleep_on_timeout` resolves the policy question of whether an idle
/// device powers down at all; with it disabled the machine parks in
/// `Idle` after a timeout and waits for the caller to restart.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStateMachine {
    state: LinkState,
    adv_window_ms: u32,
    sleep_secs: u32,
    sleep_on_timeout: bool,
}

impl LinkStateMachine {
    pub const fn new(adv_window_ms: u32, sleep_secs: u32, sleep_on_timeout: bool) -> Self {
        Self {
            state: LinkState::Idle,
            adv_window_ms,
            sleep_secs,
            sleep_on_timeout,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Device start: begin broadcasting presence.
    ///
    /// Only meaningful from `Idle`; calling it in any other state is a
    /// caller error and is ignored.
    pub fn start(&mut self) -> LinkAction {
        match self.state {
            LinkState::Idle => {
                self.state = LinkState::Advertising;
                LinkAction::StartAdvertising {
                    window_ms: self.adv_window_ms,
                }
            }
            _ => LinkAction::None,
        }
    }

    /// A host established a link.  Cancels any pending sleep.
    pub fn on_connect(&mut self) {
        self.state = LinkState::Connected;
    }

    /// The (last) host dropped the link.  Resume advertising so the
    /// device stays discoverable for another host.
    pub fn on_disconnect(&mut self) -> LinkAction {
        match self.state {
            LinkState::Connected => {
                self.state = LinkState::Advertising;
                LinkAction::StartAdvertising {
                    window_ms: self.adv_window_ms,
                }
            }
            _ => LinkAction::None,
        }
    }

    /// Advertising stopped; decide from the reason whether to sleep.
    pub fn on_adv_stopped(&mut self, reason: AdvStopReason) -> LinkAction {
        if self.state != LinkState::Advertising {
            return LinkAction::None;
        }

        match reason {
            // Handshake underway: the connect callback follows shortly.
            AdvStopReason::ConnectionInProgress => LinkAction::None,
            AdvStopReason::Timeout | AdvStopReason::Other(_) => {
                if self.sleep_on_timeout {
                    self.state = LinkState::SleepPending;
                    LinkAction::EnterSleep {
                        duration_secs: self.sleep_secs,
                    }
                } else {
                    self.state = LinkState::Idle;
                    LinkAction::None
                }
            }
        }
    }

    /// The transport confirmed power-down.  Terminal until `on_wake`.
    pub fn on_sleep_entered(&mut self) {
        if self.state == LinkState::SleepPending {
            self.state = LinkState::Asleep;
        }
    }

    /// External wake (timer interrupt).  Next `start` advertises again.
    pub fn on_wake(&mut self) {
        if self.state == LinkState::Asleep {
            self.state = LinkState::Idle;
        }
    }

    /// Reset to the initial state regardless of where we are.
    pub fn reset(&mut self) {
        self.state = LinkState::Idle;
    }
}
