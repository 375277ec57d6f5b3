//! Unified error type for macropad-mini.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (with the `defmt` feature) for on-target logging.

/// Top-level error type used across the firmware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // HID
    /// The outgoing report queue has no room for another report.
    ReportQueueFull,

    /// All six key slots of the keyboard report are in use.
    RolloverFull,

    /// Text injection hit a character with no key mapping.
    UnmappedChar(char),

    // Indicators
    /// The LED strip transfer failed.
    Indicator,

    // USB
    /// USB stack returned an error.
    Usb,
}
