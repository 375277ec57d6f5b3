//! Power-on mode selection.
//!
//! Holding key 1 while plugging in the pad puts it into firmware-update
//! mode: all indicators light up and control passes to the bootloader for
//! good.  Otherwise the HID interface is reset, the watchdog is armed and
//! the caller goes on to the poll loop.
//!
//! The mode is decided exactly once per power cycle (or watchdog reset).

use crate::config::{BOOT_KEY, INDICATOR_MAX};
use crate::hid::HidOutput;
use crate::indicator::{self, IndicatorDriver};
use crate::key::KeyInputs;
use crate::supervisor::Watchdog;

/// What the firmware runs after boot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMode {
    /// Run the poll loop.
    Normal,
    /// Hand the device to the bootloader. Never comes back.
    FirmwareUpdate,
}

/// Jump into the firmware-update bootloader.
pub trait Bootloader {
    fn enter(&mut self) -> !;
}

/// Mode for a given raw level of the boot key (active-low).
pub const fn select_mode(boot_key_level: bool) -> DeviceMode {
    if boot_key_level {
        DeviceMode::Normal
    } else {
        DeviceMode::FirmwareUpdate
    }
}

/// Everything the boot sequence does short of the bootloader jump.
///
/// Samples the boot key, initialises the indicator driver, and then either
/// lights every indicator white (firmware update) or resets the HID
/// interface and arms the watchdog (normal).
pub fn prepare<I, L, H, W>(inputs: &mut I, leds: &mut L, hid: &mut H, watchdog: &mut W) -> DeviceMode
where
    I: KeyInputs,
    L: IndicatorDriver,
    H: HidOutput,
    W: Watchdog,
{
    let mode = select_mode(inputs.level(BOOT_KEY));
    info!("boot: key {} selects {}", BOOT_KEY + 1, mode);

    leds.init();

    match mode {
        DeviceMode::FirmwareUpdate => {
            if let Err(e) = indicator::render_white(leds, INDICATOR_MAX) {
                warn!("boot: indicator render failed: {}", e);
            }
        }
        DeviceMode::Normal => {
            hid.init();
            watchdog.arm();
            info!("boot: watchdog armed");
        }
    }

    mode
}

/// Run the boot sequence.  Returns only in [`DeviceMode::Normal`].
pub fn boot<I, L, H, W, B>(inputs: &mut I, leds: &mut L, hid: &mut H, watchdog: &mut W, bootloader: &mut B)
where
    I: KeyInputs,
    L: IndicatorDriver,
    H: HidOutput,
    W: Watchdog,
    B: Bootloader,
{
    if prepare(inputs, leds, hid, watchdog) == DeviceMode::FirmwareUpdate {
        info!("boot: entering bootloader");
        bootloader.enter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::hid::queue::ReportQueue;
    use crate::indicator::Levels;
    use crate::Error;
    use critical_section::CriticalSection;

    #[derive(Debug, PartialEq)]
    enum Frame {
        Keys(Levels),
        White(u8),
    }

    #[derive(Default)]
    struct Strip {
        frames: Vec<Frame>,
    }

    impl IndicatorDriver for Strip {
        fn write(&mut self, _cs: CriticalSection<'_>, levels: Levels) -> Result<(), Error> {
            self.frames.push(Frame::Keys(levels));
            Ok(())
        }

        fn write_white(&mut self, _cs: CriticalSection<'_>, level: u8) -> Result<(), Error> {
            self.frames.push(Frame::White(level));
            Ok(())
        }
    }

    struct Dog;

    impl Watchdog for Dog {
        fn arm(&mut self) {}
        fn feed(&mut self) {}
    }

    #[test]
    fn boot_key_low_selects_update() {
        assert_eq!(select_mode(false), DeviceMode::FirmwareUpdate);
        assert_eq!(select_mode(true), DeviceMode::Normal);
    }

    #[test]
    fn firmware_update_lights_all_white() {
        let mut strip = Strip::default();
        let mode = prepare(&mut [false, true, true], &mut strip, &mut ReportQueue::new(), &mut Dog);
        assert_eq!(mode, DeviceMode::FirmwareUpdate);
        assert_eq!(strip.frames, [Frame::White(INDICATOR_MAX)]);
    }

    #[test]
    fn normal_boot_renders_nothing() {
        let mut strip = Strip::default();
        prepare(&mut [true; 3], &mut strip, &mut ReportQueue::new(), &mut Dog);
        assert!(strip.frames.is_empty());
    }
}
