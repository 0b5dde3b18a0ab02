//! Integration scenarios for the bledial host-testable core.
//!
//! A simulated transport records every notification together with a
//! virtual timestamp advanced by the debounce delay, so spacing
//! guarantees can be asserted without real time.

use std::cell::RefCell;
use std::rc::Rc;

use bledial::dispatcher::{Delay, ReportSink, SinkError};
use bledial::hid::dial::RadialReport;
use bledial::hid::RADIAL_CONTROLLER_REPORT_ID;
use bledial::lifecycle::{AdvStopReason, LinkAction};
use bledial::{DeviceIdentity, DialConfig, HapticDial};

#[derive(Default)]
struct Wire {
    now_ms: u64,
    sent: Vec<(u64, u8, Vec<u8>)>,
}

#[derive(Clone, Default)]
struct SimTransport(Rc<RefCell<Wire>>);

impl ReportSink for SimTransport {
    fn notify(&mut self, report_id: u8, payload: &[u8]) -> Result<(), SinkError> {
        let mut wire = self.0.borrow_mut();
        let now = wire.now_ms;
        wire.sent.push((now, report_id, payload.to_vec()));
        Ok(())
    }
}

impl Delay for SimTransport {
    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().now_ms += ms as u64;
    }
}

fn connected_dial(wire: &SimTransport) -> HapticDial<SimTransport, SimTransport> {
    let mut dial = HapticDial::new(
        DeviceIdentity::default(),
        DialConfig::default(),
        wire.clone(),
        wire.clone(),
    );
    assert_eq!(
        dial.begin(),
        LinkAction::StartAdvertising { window_ms: 5_000 }
    );
    dial.on_adv_stopped(AdvStopReason::ConnectionInProgress);
    dial.on_connect();
    dial
}

#[test]
fn rotate_scenario_sends_cumulative_values_debounce_spaced() {
    let wire = SimTransport::default();
    let mut dial = connected_dial(&wire);

    dial.rotate(120).unwrap();
    dial.rotate(-50).unwrap();
    assert_eq!(dial.rotation(), 70);

    let wire = wire.0.borrow();
    assert_eq!(wire.sent.len(), 2);

    let (t0, id0, ref p0) = wire.sent[0];
    let (t1, id1, ref p1) = wire.sent[1];
    assert_eq!(id0, RADIAL_CONTROLLER_REPORT_ID);
    assert_eq!(id1, RADIAL_CONTROLLER_REPORT_ID);

    // Each report encodes the cumulative rotation at time of send.
    assert_eq!(RadialReport::from_bytes(p0).unwrap().rotation, 120);
    assert_eq!(RadialReport::from_bytes(p1).unwrap().rotation, 70);

    // Transmissions are at least the 10 ms debounce apart.
    assert!(t1 - t0 >= 10, "sends {t0} and {t1} too close");
}

#[test]
fn click_scenario_press_release_when_connected() {
    let wire = SimTransport::default();
    let mut dial = connected_dial(&wire);

    dial.click();

    let wire = wire.0.borrow();
    assert_eq!(wire.sent.len(), 2);
    assert!(RadialReport::from_bytes(&wire.sent[0].2).unwrap().button);
    assert!(!RadialReport::from_bytes(&wire.sent[1].2).unwrap().button);
    // Two debounce waits total (one after each edge).
    assert_eq!(wire.now_ms, 20);
}

#[test]
fn click_scenario_silent_but_stateful_when_disconnected() {
    let wire = SimTransport::default();
    let mut dial = HapticDial::new(
        DeviceIdentity::default(),
        DialConfig::default(),
        wire.clone(),
        wire.clone(),
    );
    dial.begin();

    dial.click();
    dial.rotate(120).unwrap();
    assert_eq!(dial.rotation(), 120);
    assert!(wire.0.borrow().sent.is_empty());

    // A host that connects later sees the preserved state in the next
    // report.
    dial.on_connect();
    dial.rotate(1).unwrap();
    let wire = wire.0.borrow();
    assert_eq!(wire.sent.len(), 1);
    assert_eq!(RadialReport::from_bytes(&wire.sent[0].2).unwrap().rotation, 121);
}

#[test]
fn repeated_press_is_suppressed() {
    let wire = SimTransport::default();
    let mut dial = connected_dial(&wire);

    dial.press();
    dial.press();
    dial.release();

    assert_eq!(wire.0.borrow().sent.len(), 2);
}

#[test]
fn unattended_advertising_window_sleeps_until_external_wake() {
    let wire = SimTransport::default();
    let mut dial = HapticDial::new(
        DeviceIdentity::default(),
        DialConfig::default(),
        wire.clone(),
        wire.clone(),
    );

    dial.begin();
    let action = dial.on_adv_stopped(AdvStopReason::Timeout);
    assert_eq!(action, LinkAction::EnterSleep { duration_secs: 20 });
    dial.on_sleep_entered();

    // No further advertising while asleep.
    assert_eq!(dial.begin(), LinkAction::None);

    dial.on_wake();
    assert_eq!(
        dial.begin(),
        LinkAction::StartAdvertising { window_ms: 5_000 }
    );
}

#[test]
fn input_that_wakes_a_parked_device_is_kept() {
    let wire = SimTransport::default();
    let mut cfg = DialConfig::default();
    cfg.sleep_on_timeout = false;
    let mut dial = HapticDial::new(
        DeviceIdentity::default(),
        cfg,
        wire.clone(),
        wire.clone(),
    );

    dial.begin();
    assert_eq!(dial.on_adv_stopped(AdvStopReason::Timeout), LinkAction::None);

    // Input restarts the cycle.  The restart resets device state, so it
    // must happen before the waking input is applied, or a Rotate that
    // woke the device would read back as zero.
    assert_eq!(
        dial.begin(),
        LinkAction::StartAdvertising { window_ms: 5_000 }
    );
    dial.rotate(900).unwrap();
    assert_eq!(dial.rotation(), 900);
}

#[test]
fn connection_in_progress_survives_the_window() {
    let wire = SimTransport::default();
    let mut dial = HapticDial::new(
        DeviceIdentity::default(),
        DialConfig::default(),
        wire.clone(),
        wire.clone(),
    );

    dial.begin();
    // Window closed because a host started its handshake: no sleep.
    assert_eq!(
        dial.on_adv_stopped(AdvStopReason::ConnectionInProgress),
        LinkAction::None
    );
    dial.on_connect();
    assert!(dial.is_connected());

    // Disconnect resumes advertising instead of stopping outright.
    assert_eq!(
        dial.on_disconnect(),
        LinkAction::StartAdvertising { window_ms: 5_000 }
    );
}

#[test]
fn haptic_output_report_round_trip() {
    let wire = SimTransport::default();
    let mut dial = connected_dial(&wire);

    let cmd = dial.on_output_report(&[0x50, 0x01, 0x00, 0x03, 0x10]).unwrap();
    assert_eq!(cmd.intensity, 0x50);
    assert_eq!(cmd.manual_trigger, bledial::hid::haptic::WAVEFORM_PRESS);

    let err = dial.on_output_report(&[0x50]).unwrap_err();
    assert_eq!(
        err,
        bledial::Error::Decode(bledial::DecodeError::Length {
            expected: 5,
            got: 1
        })
    );
}
