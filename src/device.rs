//! The device object - ties state, lifecycle and dispatch together.
//!
//! [`HapticDial`] owns the dial state, the lifecycle machine and the
//! report dispatcher.  The application layer drives it from physical
//! input sampling (`press`/`release`/`rotate`), and the transport
//! wiring feeds connection events into the `on_*` observer methods.
//! Those callbacks are delivered serially by the transport; the device
//! never assumes concurrent reentry.

use crate::config;
use crate::dispatcher::{Delay, ReportDispatcher, ReportSink};
use crate::error::Error;
use crate::hid::dial::DialState;
use crate::hid::haptic::{HapticCommand, HapticFeatureReport};
use crate::lifecycle::{AdvStopReason, LinkAction, LinkStateMachine};

/// Immutable identity strings and PnP numbers, set once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceIdentity {
    pub name: &'static str,
    pub manufacturer: &'static str,
    pub vendor_id: u16,
    pub product_id: u16,
    pub version: u16,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            name: config::DEVICE_NAME,
            manufacturer: config::DEVICE_MANUFACTURER,
            vendor_id: config::VENDOR_ID,
            product_id: config::PRODUCT_ID,
            version: config::VERSION,
        }
    }
}

/// Tunable per-instance settings (the identity's mutable sibling).
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DialConfig {
    /// Initial battery level (percent).
    pub battery_level: u8,
    /// Minimum spacing between report transmissions (ms).
    pub debounce_ms: u32,
    /// Bounded advertising window (ms).
    pub adv_window_ms: u32,
    /// Sleep duration after an expired window (seconds).
    pub sleep_secs: u32,
    /// Whether an expired window sleeps at all.
    pub sleep_on_timeout: bool,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            battery_level: config::DEFAULT_BATTERY_LEVEL,
            debounce_ms: config::DEBOUNCE_MS,
            adv_window_ms: config::ADV_WINDOW_MS,
            sleep_secs: config::ADV_TIMEOUT_SLEEP_SECS,
            sleep_on_timeout: config::SLEEP_ON_ADV_TIMEOUT,
        }
    }
}

/// BLE HID radial controller device.
pub struct HapticDial<S: ReportSink, D: Delay> {
    identity: DeviceIdentity,
    state: DialState,
    battery_level: u8,
    haptics: HapticFeatureReport,
    link: LinkStateMachine,
    dispatcher: ReportDispatcher<S, D>,
}

impl<S: ReportSink, D: Delay> HapticDial<S, D> {
    pub fn new(identity: DeviceIdentity, cfg: DialConfig, sink: S, delay: D) -> Self {
        Self {
            identity,
            state: DialState::new(),
            battery_level: cfg.battery_level,
            haptics: HapticFeatureReport::default(),
            link: LinkStateMachine::new(cfg.adv_window_ms, cfg.sleep_secs, cfg.sleep_on_timeout),
            dispatcher: ReportDispatcher::new(sink, delay, cfg.debounce_ms),
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Start the device: reset state and request the first advertising
    /// window.  Calling `begin` twice without an intervening `end` is a
    /// caller error; the second call returns `LinkAction::None`.
    pub fn begin(&mut self) -> LinkAction {
        self.state.reset();
        self.link.start()
    }

    /// Return device state to its initial reset values.
    pub fn end(&mut self) {
        self.state.reset();
        self.link.reset();
    }

    // - Physical input -------------------------------------------------

    pub fn press(&mut self) {
        self.button(true);
    }

    pub fn release(&mut self) {
        self.button(false);
    }

    /// Press then release, each edge debounce-spaced like any other send.
    pub fn click(&mut self) {
        self.press();
        self.release();
    }

    /// Apply a rotation delta (tenths of a degree) and transmit.
    ///
    /// Rotation changes are always meaningful, so every accepted delta
    /// dispatches a report (rate-limited by the debounce interval).
    pub fn rotate(&mut self, delta: i16) -> Result<(), Error> {
        self.state.rotate(delta)?;
        self.dispatcher.dispatch(&self.state);
        Ok(())
    }

    /// Edge-triggered button update: an unchanged value sends nothing.
    fn button(&mut self, pressed: bool) {
        if self.state.set_button(pressed) {
            self.dispatcher.dispatch(&self.state);
        }
    }

    // - Queries --------------------------------------------------------

    pub fn is_pressed(&self) -> bool {
        self.state.is_pressed()
    }

    pub fn rotation(&self) -> i16 {
        self.state.rotation()
    }

    pub fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    pub fn battery_level(&self) -> u8 {
        self.battery_level
    }

    /// Update the reported battery level.  The embedded wiring mirrors
    /// this into the GATT battery service.
    pub fn set_battery_level(&mut self, level: u8) {
        self.battery_level = level;
    }

    /// Feature-report content the transport returns on a host read.
    pub fn haptic_features(&self) -> &HapticFeatureReport {
        &self.haptics
    }

    // - Transport observer hooks ---------------------------------------

    pub fn on_connect(&mut self) {
        self.link.on_connect();
        self.dispatcher.set_connected(true);
    }

    pub fn on_disconnect(&mut self) -> LinkAction {
        self.dispatcher.set_connected(false);
        self.link.on_disconnect()
    }

    pub fn on_adv_stopped(&mut self, reason: AdvStopReason) -> LinkAction {
        self.link.on_adv_stopped(reason)
    }

    /// The transport could not register or start advertising.  The
    /// device parks non-discoverable; there is no automatic retry, the
    /// caller decides when to call `begin` again.  Returns the error
    /// for the caller to log.
    pub fn on_adv_failed(&mut self) -> Error {
        self.link.reset();
        Error::AdvertisingFailed
    }

    pub fn on_sleep_entered(&mut self) {
        self.link.on_sleep_entered();
    }

    pub fn on_wake(&mut self) {
        self.link.on_wake();
    }

    /// Inbound haptic output report from the host.  Decoded here and
    /// handed back for the haptic actuator driver to execute.
    pub fn on_output_report(&mut self, data: &[u8]) -> Result<HapticCommand, Error> {
        let cmd = HapticCommand::decode(data)?;
        // The output fields shadow the matching feature fields.
        self.haptics.intensity = cmd.intensity;
        self.haptics.repeat_count = cmd.repeat_count;
        self.haptics.retrigger_period = cmd.retrigger_period;
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::testkit::{MockDelay, MockSink};
    use crate::lifecycle::LinkState;

    fn dial<'a>(
        sink: &'a mut MockSink,
        delay: &'a mut MockDelay,
    ) -> HapticDial<&'a mut MockSink, &'a mut MockDelay> {
        HapticDial::new(
            DeviceIdentity::default(),
            DialConfig::default(),
            sink,
            delay,
        )
    }

    #[test]
    fn begin_requests_advertising_once() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);

        assert_eq!(
            d.begin(),
            LinkAction::StartAdvertising { window_ms: 5_000 }
        );
        assert_eq!(d.begin(), LinkAction::None);
    }

    #[test]
    fn duplicate_press_sends_one_report() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();
        d.on_connect();

        d.press();
        d.press();
        assert!(d.is_pressed());
        assert_eq!(sink.sent.len(), 1);
    }

    #[test]
    fn click_sends_press_then_release() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();
        d.on_connect();

        d.click();
        assert!(!d.is_pressed());
        assert_eq!(sink.sent.len(), 2);
        assert_eq!(sink.sent[0].1, [0x01, 0x00]); // press
        assert_eq!(sink.sent[1].1, [0x00, 0x00]); // release
        // Two transmissions, two debounce waits.
        assert_eq!(delay.calls, 2);
    }

    #[test]
    fn click_while_disconnected_updates_state_silently() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();

        d.click();
        d.rotate(30).unwrap();
        assert_eq!(d.rotation(), 30);
        assert!(sink.sent.is_empty());
        assert_eq!(delay.calls, 0);
    }

    #[test]
    fn rotations_send_cumulative_values() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();
        d.on_connect();

        d.rotate(120).unwrap();
        d.rotate(-50).unwrap();
        assert_eq!(d.rotation(), 70);
        assert_eq!(sink.sent.len(), 2);
        assert_eq!(sink.sent[0].1, [0xF0, 0x00]); // 120 << 1
        assert_eq!(sink.sent[1].1, [0x8C, 0x00]); // 70 << 1
        assert_eq!(delay.slept_ms, 20);
    }

    #[test]
    fn rotate_out_of_range_sends_nothing() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();
        d.on_connect();

        assert!(d.rotate(3601).is_err());
        assert_eq!(d.rotation(), 0);
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn disconnect_resumes_advertising_and_mutes_sends() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();
        d.on_connect();
        assert!(d.is_connected());

        assert_eq!(
            d.on_disconnect(),
            LinkAction::StartAdvertising { window_ms: 5_000 }
        );
        assert!(!d.is_connected());
        d.press();
        assert!(d.is_pressed());
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn output_report_updates_feature_shadow() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);

        let cmd = d.on_output_report(&[0x30, 1, 5, 0x04, 0x10]).unwrap();
        assert_eq!(cmd.manual_trigger, 0x1004);
        assert_eq!(d.haptic_features().intensity, 0x30);
        assert_eq!(d.haptic_features().repeat_count, 1);
        assert_eq!(d.haptic_features().retrigger_period, 5);

        assert!(d.on_output_report(&[0x30, 1]).is_err());
    }

    #[test]
    fn end_resets_everything() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();
        d.on_connect();
        d.press();
        d.rotate(100).unwrap();

        d.end();
        assert!(!d.is_pressed());
        assert_eq!(d.rotation(), 0);
        assert!(!d.is_connected());
    }

    #[test]
    fn default_identity_matches_config() {
        let id = DeviceIdentity::default();
        assert_eq!(id.vendor_id, 0x045E);
        assert_eq!(id.product_id, 0x0905);
        assert_eq!(id.name, "BLE Haptic Dial");
    }

    #[test]
    fn adv_timeout_path_reaches_sleep() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();

        let action = d.on_adv_stopped(AdvStopReason::Timeout);
        assert_eq!(action, LinkAction::EnterSleep { duration_secs: 20 });
        d.on_sleep_entered();
        d.on_wake();
        assert_eq!(
            d.begin(),
            LinkAction::StartAdvertising { window_ms: 5_000 }
        );
    }

    #[test]
    fn adv_failure_parks_until_begin_retries() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();

        assert_eq!(d.on_adv_failed(), Error::AdvertisingFailed);
        assert!(!d.is_connected());
        // The retry path is an explicit restart.
        assert_eq!(
            d.begin(),
            LinkAction::StartAdvertising { window_ms: 5_000 }
        );
    }

    #[test]
    fn link_state_is_observable() {
        let mut sink = MockSink::default();
        let mut delay = MockDelay::default();
        let mut d = dial(&mut sink, &mut delay);
        d.begin();
        assert_eq!(
            d.on_adv_stopped(AdvStopReason::ConnectionInProgress),
            LinkAction::None
        );
        d.on_connect();
        assert_eq!(d.link.state(), LinkState::Connected);
    }
}
