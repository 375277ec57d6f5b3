//! Application-wide constants and compile-time configuration.
//!
//! All key, indicator, timing and USB identity parameters live here so
//! they can be tuned in one place.

use smart_leds::RGB8;

// Keys

/// Number of physical keys (and indicators).
pub const KEY_COUNT: usize = 3;

/// Key sampled at power-on to select firmware-update mode (key 1).
pub const BOOT_KEY: usize = 0;

/// Consecutive differing samples needed to accept an edge.
/// 1 = accept on the first differing poll (no extra filtering).
pub const DEBOUNCE_POLLS: u8 = 1;

// Timing

/// Main poll loop period (ms). Also the only contact-bounce filter.
pub const POLL_INTERVAL_MS: u64 = 5;

/// Wait after clock setup before sampling the boot key (ms).
pub const CLOCK_SETTLE_MS: u64 = 10;

/// Watchdog timeout (ms). Must cover the slowest key handler plus the
/// USB drain of its reports.
pub const WATCHDOG_TIMEOUT_MS: u32 = 2_000;

// Indicators

/// Intensity a key's indicator jumps to on press.
pub const INDICATOR_MAX: u8 = 255;

/// Intensity the indicators glow at on power-up before fading out.
pub const INDICATOR_INITIAL: u8 = 127;

/// Per-channel output value at full intensity. The pixels are far too
/// bright at 255 for a desk device.
pub const INDICATOR_RENDER_LIMIT: u8 = 127;

/// Colour of each key's indicator at full intensity.
pub const INDICATOR_COLORS: [RGB8; KEY_COUNT] = [
    RGB8 { r: 255, g: 0, b: 0 },
    RGB8 { r: 0, g: 255, b: 0 },
    RGB8 { r: 0, g: 0, b: 255 },
];

/// Keep re-lighting a key's indicator while it is held.
pub const HOLD_KEEPS_LIT: bool = false;

// HID

/// Depth of the outgoing HID report queue (reports + pauses).
pub const REPORT_QUEUE_DEPTH: usize = 128;

// USB

/// USB VID/PID.
pub const USB_VID: u16 = 0x1189;
pub const USB_PID: u16 = 0x8890;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "wagiminator";
pub const USB_PRODUCT: &str = "MacroPad Mini";
pub const USB_SERIAL_NUMBER: &str = "CH552xHID";

/// Bus power budget (mA).
pub const USB_MAX_POWER_MA: u16 = 50;

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

/// Longest wait for the host to take one report (ms).
pub const USB_WRITE_TIMEOUT_MS: u64 = 50;

// GPIO pin assignments (nRF52840 Pro Micro footprint)
//
//   Key 1       → P0.17
//   Key 2       → P0.20
//   Key 3       → P0.22
//   WS2812 DIN  → P0.24 (SPIM3 MOSI)

/// Runtime knobs of the poll loop, defaulted from the constants above.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PadConfig {
    /// See [`DEBOUNCE_POLLS`].
    pub debounce_polls: u8,
    /// See [`HOLD_KEEPS_LIT`].
    pub hold_keeps_lit: bool,
    /// See [`INDICATOR_INITIAL`].
    pub initial_intensity: u8,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            debounce_polls: DEBOUNCE_POLLS,
            hold_keeps_lit: HOLD_KEEPS_LIT,
            initial_intensity: INDICATOR_INITIAL,
        }
    }
}
