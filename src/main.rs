//! MacroPad Mini firmware for nRF52840.
//!
//! Boot: sample key 1 to choose between firmware update (all indicators
//! on, reboot into the UF2 bootloader) and normal operation.
//!
//! Normal operation is a single 5 ms poll loop: sample the keys, light and
//! render the indicators, run the key macros, fade, feed the watchdog, and
//! then flush the HID reports the macros queued onto USB.
//!
//! Hardware: nRF52840 Pro Micro, three key switches, three WS2812 pixels.

#![no_std]
#![no_main]

mod board;
mod usb;

use board::{HardwareWatchdog, KeyPins, Uf2Bootloader, Ws2812Strip};
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Pull};
use embassy_nrf::{bind_interrupts, peripherals, spim};
use embassy_time::{Duration, Ticker, Timer};
use embassy_usb::UsbDevice;
use macropad::config::{self, CLOCK_SETTLE_MS, POLL_INTERVAL_MS};
use macropad::hid::queue::ReportQueue;
use macropad::{boot, keymap, MacroPad};
use static_cell::StaticCell;
use usb::hid_device::UsbDriver;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
});

static REPORTS: StaticCell<ReportQueue> = StaticCell::new();

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    usb::hid_device::run_usb_device(device).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("========================================");
    info!("{} - {} keys", config::USB_PRODUCT, config::KEY_COUNT);
    info!("USB VID:PID = {:04X}:{:04X}", config::USB_VID, config::USB_PID);
    info!("========================================");

    let p = embassy_nrf::init(Default::default());
    Timer::after_millis(CLOCK_SETTLE_MS).await;

    let mut keys = KeyPins::new([
        Input::new(p.P0_17, Pull::Up),
        Input::new(p.P0_20, Pull::Up),
        Input::new(p.P0_22, Pull::Up),
    ]);

    let mut spi_config = spim::Config::default();
    spi_config.frequency = spim::Frequency::M2;
    let spi = spim::Spim::new_txonly_nosck(p.SPI3, Irqs, p.P0_24, spi_config);
    let mut leds = Ws2812Strip::new(spi);

    let reports = REPORTS.init(ReportQueue::new());
    let mut watchdog = HardwareWatchdog::new(p.WDT);

    boot::boot(&mut keys, &mut leds, reports, &mut watchdog, &mut Uf2Bootloader);

    let (device, mut hid) = usb::hid_device::init(p.USBD);
    unwrap!(spawner.spawn(usb_task(device)));

    let mut pad = MacroPad::new(keymap::default_keymap());
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));

    info!("poll loop started");
    loop {
        pad.poll(&mut keys, &mut leds, reports, &mut watchdog);
        hid.flush(reports).await;
        ticker.next().await;
    }
}
