//! USB HID composite device - keyboard + consumer control.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and exposes two HID endpoints.  [`UsbHid::flush`] drains the
//! [`ReportQueue`] filled by the key handlers onto those endpoints.

use macropad::config;
use macropad::hid::consumer::CONSUMER_REPORT_DESCRIPTOR;
use macropad::hid::keyboard::KEYBOARD_REPORT_DESCRIPTOR;
use macropad::hid::queue::{HidCommand, ReportQueue};
use macropad::hid::HidReport;
use macropad::Error;
use defmt::{info, warn};
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_time::{with_timeout, Duration, Timer};
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;
type Writer = HidWriter<'static, UsbDriver, 8>;

static KB_STATE: StaticCell<State> = StaticCell::new();
static CONSUMER_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 128]> = StaticCell::new();

/// The two HID endpoints the pad writes to.
pub struct UsbHid {
    keyboard: Writer,
    consumer: Writer,
    /// Reports were dropped since the host last saw the full state.
    out_of_sync: bool,
}

/// Initialise the USB stack and create the composite HID device.
///
/// Must be called exactly once.  All static buffers are consumed here.
/// The returned device must be spawned with [`run_usb_device`].
pub fn init(usbd: peripherals::USBD) -> (UsbDevice<'static, UsbDriver>, UsbHid) {
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 128]),
    );

    let kb_config = HidConfig {
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let keyboard = HidWriter::new(&mut builder, KB_STATE.init(State::new()), kb_config);

    let consumer_config = HidConfig {
        report_descriptor: CONSUMER_REPORT_DESCRIPTOR,
        request_handler: None,
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let consumer = HidWriter::new(
        &mut builder,
        CONSUMER_STATE.init(State::new()),
        consumer_config,
    );

    let device = builder.build();

    info!("USB HID composite device initialised (keyboard + consumer)");

    (
        device,
        UsbHid {
            keyboard,
            consumer,
            out_of_sync: false,
        },
    )
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

impl UsbHid {
    /// Send everything queued since the last flush, in order.
    ///
    /// Pauses are honoured in place.  If a write does not complete within
    /// [`USB_WRITE_TIMEOUT_MS`](config::USB_WRITE_TIMEOUT_MS) nobody is
    /// listening (unconfigured or suspended bus) and the rest of the queue
    /// is dropped, so the watchdog is still fed on time.  The dropped
    /// entries may include releases, so the current state is then resent
    /// on every flush until the host takes it.
    pub async fn flush(&mut self, queue: &mut ReportQueue) {
        while let Some(command) = queue.pop() {
            match command {
                HidCommand::Report(report) => {
                    if let Err(e) = self.write(&report).await {
                        let mut dropped = 0;
                        while queue.pop().is_some() {
                            dropped += 1;
                        }
                        warn!("USB write failed: {}, dropped {} queued", e, dropped);
                        self.out_of_sync = true;
                    }
                }
                HidCommand::Pause(ms) => Timer::after_millis(u64::from(ms)).await,
            }
        }

        if self.out_of_sync {
            self.resync(queue).await;
        }
    }

    /// Restate the queue's current keyboard and consumer state.
    async fn resync(&mut self, queue: &ReportQueue) {
        for report in queue.state_reports() {
            if self.write(&report).await.is_err() {
                return;
            }
        }
        info!("USB host back in sync");
        self.out_of_sync = false;
    }

    async fn write(&mut self, report: &HidReport) -> Result<(), Error> {
        let mut buf = [0u8; 8];
        let n = report.serialize(&mut buf);
        let writer = match report {
            HidReport::Keyboard(_) => &mut self.keyboard,
            HidReport::Consumer(_) => &mut self.consumer,
        };
        let timeout = Duration::from_millis(config::USB_WRITE_TIMEOUT_MS);
        match with_timeout(timeout, writer.write(&buf[..n])).await {
            Ok(Ok(())) => Ok(()),
            _ => Err(Error::Usb),
        }
    }
}
