//! nRF52840 implementations of the pad's hardware traits.
//!
//! - [`KeyPins`] - the three key switches (pulled up, active-low)
//! - [`Ws2812Strip`] - the indicator pixels, bit-banged through SPIM
//! - [`HardwareWatchdog`] - the WDT peripheral
//! - [`Uf2Bootloader`] - reboot into the UF2 bootloader

use cortex_m::peripheral::SCB;
use defmt::{info, warn};
use embassy_nrf::{peripherals, wdt};
use embedded_hal::digital::InputPin;
use embedded_hal::spi::SpiBus;
use macropad::config::{KEY_COUNT, WATCHDOG_TIMEOUT_MS};
use macropad::indicator::{self, IndicatorDriver, Levels};
use macropad::{Bootloader, Error, KeyInputs, Watchdog};
use smart_leds::SmartLedsWrite;
use ws2812_spi::Ws2812;

/// Key switches, index 0 is key 1.
pub struct KeyPins<P> {
    pins: [P; KEY_COUNT],
}

impl<P: InputPin> KeyPins<P> {
    pub fn new(pins: [P; KEY_COUNT]) -> Self {
        Self { pins }
    }
}

impl<P: InputPin> KeyInputs for KeyPins<P> {
    fn level(&mut self, key: usize) -> bool {
        // An unreadable pin counts as released.
        self.pins[key].is_high().unwrap_or(true)
    }
}

/// WS2812 pixel chain driven from an SPI bus.
pub struct Ws2812Strip<SPI> {
    pixels: Ws2812<SPI>,
}

impl<SPI: SpiBus<u8>> Ws2812Strip<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self {
            pixels: Ws2812::new(spi),
        }
    }
}

impl<SPI: SpiBus<u8>> IndicatorDriver for Ws2812Strip<SPI> {
    fn init(&mut self) {
        // Pixels keep their last colour across a soft reset.
        if let Err(e) = indicator::render(self, [0; KEY_COUNT]) {
            warn!("indicator: clear failed: {}", e);
        }
    }

    fn write(&mut self, _cs: critical_section::CriticalSection<'_>, levels: Levels) -> Result<(), Error> {
        self.pixels
            .write(indicator::composite(levels))
            .map_err(|_| Error::Indicator)
    }

    fn write_white(&mut self, _cs: critical_section::CriticalSection<'_>, level: u8) -> Result<(), Error> {
        self.pixels
            .write(indicator::white(level))
            .map_err(|_| Error::Indicator)
    }
}

/// The WDT peripheral, started on [`Watchdog::arm`].
pub struct HardwareWatchdog {
    peripheral: Option<peripherals::WDT>,
    handle: Option<wdt::WatchdogHandle>,
}

impl HardwareWatchdog {
    pub fn new(peripheral: peripherals::WDT) -> Self {
        Self {
            peripheral: Some(peripheral),
            handle: None,
        }
    }
}

impl Watchdog for HardwareWatchdog {
    fn arm(&mut self) {
        let Some(peripheral) = self.peripheral.take() else {
            return;
        };

        let mut config = wdt::Config::default();
        // The WDT counts the 32.768 kHz low-frequency clock.
        config.timeout_ticks = 32_768 * WATCHDOG_TIMEOUT_MS / 1_000;
        config.action_during_debug_halt = wdt::HaltConfig::PAUSE;

        match wdt::Watchdog::try_new::<1>(peripheral, config) {
            Ok((_, [handle])) => {
                info!("watchdog: {} ms", WATCHDOG_TIMEOUT_MS);
                self.handle = Some(handle);
            }
            Err(_) => {
                // Still running from before a soft reset, with its old
                // configuration. Keep feeding it on the first handle.
                warn!("watchdog: already running, reusing it");
                // SAFETY: handle 0 always exists and nothing else pets it.
                self.handle = Some(unsafe { wdt::WatchdogHandle::steal(0) });
            }
        }
    }

    fn feed(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.pet();
        }
    }
}

/// Reboots into the Adafruit UF2 bootloader.
pub struct Uf2Bootloader;

impl Uf2Bootloader {
    /// `POWER.GPREGRET`, retained across a soft reset.
    const GPREGRET: *mut u32 = 0x4000_051C as *mut u32;
    /// Magic the bootloader checks to stay in UF2 mass-storage mode.
    const DFU_MAGIC_UF2: u32 = 0x57;
}

impl Bootloader for Uf2Bootloader {
    fn enter(&mut self) -> ! {
        // SAFETY: GPREGRET is a plain retained register with no side effects
        // on write.
        unsafe { core::ptr::write_volatile(Self::GPREGRET, Self::DFU_MAGIC_UF2) };
        SCB::sys_reset()
    }
}
