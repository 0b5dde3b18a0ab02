//! Embedded entry point - nRF52840 + SoftDevice S140, peripheral role.
//!
//! Boots Embassy, enables the SoftDevice with the device identity from
//! the core library, builds the GATT server and hands control to the
//! runner task.  A demo input task stands in for the real dial/ADC
//! sampling, which belongs to the board support layer.

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use bledial::ble::{
    advertising, runner, server::Server, BlockingDelay, ChannelSink, CommandChannel, DialCommand,
    ReportChannel,
};
use bledial::{DeviceIdentity, DialConfig, HapticDial};
use defmt::info;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Sender;
use embassy_time::{Duration, Timer};
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

static COMMANDS: CommandChannel = CommandChannel::new();
static REPORTS: ReportChannel = ReportChannel::new();
static SERVER: StaticCell<Server> = StaticCell::new();

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

#[embassy_executor::task]
async fn ble_task(
    sd: &'static Softdevice,
    server: &'static Server,
    dial: HapticDial<ChannelSink, BlockingDelay>,
) -> ! {
    runner::run(sd, server, dial, COMMANDS.receiver(), REPORTS.receiver()).await
}

/// Placeholder input source: clicks and quarter-turns until the real
/// encoder/button sampling is wired up.
#[embassy_executor::task]
async fn demo_input_task(commands: Sender<'static, CriticalSectionRawMutex, DialCommand, 8>) {
    loop {
        Timer::after(Duration::from_secs(3)).await;
        commands.send(DialCommand::Rotate(900)).await;
        Timer::after(Duration::from_secs(3)).await;
        commands.send(DialCommand::Rotate(-900)).await;
        Timer::after(Duration::from_secs(3)).await;
        commands.send(DialCommand::Click).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("bledial starting");

    // Interrupt priorities 0/1/4 are reserved by the SoftDevice.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = embassy_nrf::interrupt::Priority::P2;
    nrf_config.time_interrupt_priority = embassy_nrf::interrupt::Priority::P2;
    let _p = embassy_nrf::init(nrf_config);

    let identity = DeviceIdentity::default();
    let sd = Softdevice::enable(&advertising::softdevice_config(&identity));

    let server = SERVER.init(Server::start(sd, &identity));
    // Attribute table registered; only shared access from here on.
    let sd: &'static Softdevice = sd;

    let dial = HapticDial::new(
        identity,
        DialConfig::default(),
        ChannelSink::new(REPORTS.sender()),
        BlockingDelay,
    );

    spawner.spawn(softdevice_task(sd)).unwrap();
    spawner.spawn(ble_task(sd, server, dial)).unwrap();
    spawner.spawn(demo_input_task(COMMANDS.sender())).unwrap();

    info!("setup done");
}
