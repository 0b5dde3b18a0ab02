//! Runner task - owns the device object and executes its link actions.
//!
//! One loop iteration per wake cycle: advertise within the bounded
//! window, serve a connection until it drops, or sleep out the timeout.
//! All device-state mutation happens here, so the core's single-thread
//! assumption holds without locks.

use crate::ble::server::{
    BatteryServiceEvent, HidServiceEvent, Server, ServerEvent,
};
use crate::ble::{advertising, BlockingDelay, ChannelSink, DialCommand};
use crate::device::HapticDial;
use crate::hid::descriptor::RADIAL_CONTROLLER_REPORT_ID;
use crate::hid::dial::RADIAL_REPORT_SIZE;
use crate::hid::haptic::{HAPTIC_FEATURE_REPORT_SIZE, HAPTIC_OUTPUT_REPORT_SIZE};
use crate::lifecycle::{AdvStopReason, LinkAction};
use defmt::{info, warn};
use embassy_futures::select::{select4, Either4};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_time::{Duration, Timer};
use nrf_softdevice::ble::peripheral::{self, AdvertiseError};
use nrf_softdevice::ble::{gatt_server, Connection};
use nrf_softdevice::Softdevice;

type CommandRx = Receiver<'static, CriticalSectionRawMutex, DialCommand, 8>;
type ReportRx =
    Receiver<'static, CriticalSectionRawMutex, (u8, [u8; RADIAL_REPORT_SIZE]), 8>;

/// Main device loop.  Never returns; the device cycles between
/// advertising, serving a host and sleeping until reset.
pub async fn run(
    sd: &'static Softdevice,
    server: &'static Server,
    mut dial: HapticDial<ChannelSink, BlockingDelay>,
    cmd_rx: CommandRx,
    report_rx: ReportRx,
) -> ! {
    let mut action = dial.begin();

    loop {
        match action {
            LinkAction::StartAdvertising { window_ms } => {
                action = advertise_once(sd, server, &mut dial, &cmd_rx, &report_rx, window_ms)
                    .await;
            }
            LinkAction::EnterSleep { duration_secs } => {
                info!("no host - sleeping {} s", duration_secs);
                dial.on_sleep_entered();
                // Stand-in for SYSTEM OFF: idle until the wakeup timer
                // fires, then restart the cycle.
                Timer::after(Duration::from_secs(duration_secs as u64)).await;
                dial.on_wake();
                action = dial.begin();
            }
            LinkAction::None => {
                // Lifecycle parked (sleep disabled, or advertising
                // failed); wait for input activity.  Restart before
                // applying the input so the restart's state reset
                // cannot wipe it.
                let cmd = cmd_rx.receive().await;
                action = dial.begin();
                apply_command(&mut dial, server, None, cmd);
            }
        }
    }
}

/// One advertising window.  Returns the next action to execute.
async fn advertise_once(
    sd: &'static Softdevice,
    server: &'static Server,
    dial: &mut HapticDial<ChannelSink, BlockingDelay>,
    cmd_rx: &CommandRx,
    report_rx: &ReportRx,
    window_ms: u32,
) -> LinkAction {
    let config = advertising::adv_config(window_ms);
    let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
        adv_data: advertising::ADV_DATA,
        scan_data: advertising::SCAN_DATA,
    };

    info!("advertising ({} ms window)", window_ms);
    match peripheral::advertise_connectable(sd, adv, &config).await {
        Ok(conn) => {
            // The "stopped because a client is connecting" callback and
            // the connect callback collapse into the Ok path here.
            dial.on_adv_stopped(AdvStopReason::ConnectionInProgress);
            dial.on_connect();
            info!("host connected");
            if conn.set_conn_params(advertising::conn_params()).is_err() {
                warn!("conn param update rejected");
            }
            server.set_battery_level(Some(&conn), dial.battery_level());

            serve_connection(sd, server, dial, &conn, cmd_rx, report_rx).await;

            info!("host disconnected");
            dial.on_disconnect()
        }
        Err(AdvertiseError::Timeout) => dial.on_adv_stopped(AdvStopReason::Timeout),
        Err(_) => {
            // Non-discoverable until input activity restarts the cycle;
            // no automatic retry.
            warn!("{}", dial.on_adv_failed());
            LinkAction::None
        }
    }
}

/// Serve one connection until it drops: GATT events, input commands and
/// dispatcher reports are multiplexed on this task.
async fn serve_connection(
    sd: &'static Softdevice,
    server: &'static Server,
    dial: &mut HapticDial<ChannelSink, BlockingDelay>,
    conn: &Connection,
    cmd_rx: &CommandRx,
    report_rx: &ReportRx,
) {
    // The GATT callback runs on this task but cannot borrow `dial`
    // mutably while the select loop does, so host writes hop through a
    // task-local channel.
    let haptic_writes: Channel<CriticalSectionRawMutex, [u8; HAPTIC_OUTPUT_REPORT_SIZE], 4> =
        Channel::new();

    let gatt = gatt_server::run(conn, server, |event| match event {
        ServerEvent::Hid(e) => match e {
            HidServiceEvent::HapticReportWrite(data) => {
                if haptic_writes.try_send(data).is_err() {
                    warn!("haptic write queue full - dropping command");
                }
            }
            HidServiceEvent::RadialReportCccdWrite { notifications } => {
                info!("radial notifications {}", notifications);
            }
            HidServiceEvent::ControlPointWrite(cmd) => {
                info!("HID control point: {}", cmd);
            }
        },
        ServerEvent::Bas(e) => match e {
            BatteryServiceEvent::BatteryLevelCccdWrite { notifications } => {
                info!("battery notifications {}", notifications);
            }
        },
        // Device Information is read-only; it produces no events.
        ServerEvent::Dis(_) => {}
    });
    let mut gatt = core::pin::pin!(gatt);

    loop {
        match select4(
            &mut gatt,
            cmd_rx.receive(),
            report_rx.receive(),
            haptic_writes.receive(),
        )
        .await
        {
            Either4::First(_disconnected) => break,
            Either4::Second(cmd) => {
                apply_command(dial, server, Some(conn), cmd);
            }
            Either4::Third((report_id, payload)) => {
                if report_id == RADIAL_CONTROLLER_REPORT_ID
                    && server.notify_radial(conn, &payload).is_err()
                {
                    // Report dropped; the disconnect follows.
                    warn!("notify failed - report dropped");
                }
            }
            Either4::Fourth(data) => match dial.on_output_report(&data) {
                // Handing the command to the actuator driver is the
                // haptics collaborator's job; we only log it here.
                Ok(cmd) => {
                    let mut feature = [0u8; HAPTIC_FEATURE_REPORT_SIZE];
                    dial.haptic_features().serialize(&mut feature);
                    let _ = server.hid.haptic_feature_set(sd, &feature);
                    info!(
                        "haptic command: intensity={} repeat={} trigger={=u16:x}",
                        cmd.intensity, cmd.repeat_count, cmd.manual_trigger
                    );
                }
                Err(e) => warn!("malformed haptic report: {}", e),
            },
        }
    }

    // Drain reports queued while the link was going down.
    while report_rx.try_receive().is_ok() {}
}

/// Apply one input command to the device.
fn apply_command(
    dial: &mut HapticDial<ChannelSink, BlockingDelay>,
    server: &'static Server,
    conn: Option<&Connection>,
    cmd: DialCommand,
) {
    match cmd {
        DialCommand::Press => dial.press(),
        DialCommand::Release => dial.release(),
        DialCommand::Click => dial.click(),
        DialCommand::Rotate(delta) => {
            if let Err(e) = dial.rotate(delta) {
                warn!("rotate rejected: {}", e);
            }
        }
        DialCommand::SetBatteryLevel(level) => {
            dial.set_battery_level(level);
            server.set_battery_level(conn, level);
        }
    }
}
