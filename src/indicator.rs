//! Indicator brightness model and rendering.
//!
//! Every key owns one indicator.  A press lights it at [`INDICATOR_MAX`];
//! after that it loses one step per poll, so a full fade takes
//! `INDICATOR_MAX` polls (about 1.3 s at a 5 ms poll).
//!
//! The indicators are WS2812-style pixels whose single-wire protocol is
//! timing critical: an interrupt in the middle of a frame corrupts the
//! colours.  [`render`] therefore hands the frame to the driver from
//! inside a critical section, and the driver's write method demands the
//! [`CriticalSection`] token so it cannot be called from outside one.

use critical_section::CriticalSection;
use smart_leds::RGB8;

use crate::config::{INDICATOR_COLORS, INDICATOR_MAX, INDICATOR_RENDER_LIMIT, KEY_COUNT};
use crate::Error;

/// Intensities of all indicators, in key order.
pub type Levels = [u8; KEY_COUNT];

/// Sink for indicator frames (the LED strip).
pub trait IndicatorDriver {
    /// One-time setup, before the first frame.
    fn init(&mut self) {}

    /// Push one frame.  Only callable with interrupts suspended.
    fn write(&mut self, cs: CriticalSection<'_>, levels: Levels) -> Result<(), Error>;

    /// Push a frame with every pixel white at `level`, regardless of the
    /// key colours.  Drivers without colour see `level` on every key.
    fn write_white(&mut self, cs: CriticalSection<'_>, level: u8) -> Result<(), Error> {
        self.write(cs, [level; KEY_COUNT])
    }
}

/// Brightness state of the indicators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Indicators {
    levels: Levels,
}

impl Indicators {
    /// All indicators at `intensity`.
    pub const fn new(intensity: u8) -> Self {
        Self {
            levels: [intensity; KEY_COUNT],
        }
    }

    pub const fn levels(&self) -> Levels {
        self.levels
    }

    pub fn level(&self, key: usize) -> u8 {
        self.levels[key]
    }

    /// Light `key` at full intensity, restarting any fade in progress.
    pub fn light(&mut self, key: usize) {
        self.levels[key] = INDICATOR_MAX;
    }

    /// One fade step on every indicator.
    pub fn decay(&mut self) {
        for level in self.levels.iter_mut() {
            *level = level.saturating_sub(1);
        }
    }
}

impl Default for Indicators {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Push `levels` to the driver with interrupts suspended for the whole
/// frame.  The critical section ends on every return path.
pub fn render<D: IndicatorDriver>(driver: &mut D, levels: Levels) -> Result<(), Error> {
    critical_section::with(|cs| driver.write(cs, levels))
}

/// Like [`render`], but every pixel white at `level`.
pub fn render_white<D: IndicatorDriver>(driver: &mut D, level: u8) -> Result<(), Error> {
    critical_section::with(|cs| driver.write_white(cs, level))
}

/// Scale an 8-bit intensity by `limit / 255`.
pub const fn scale(value: u8, limit: u8) -> u8 {
    ((value as u16 * limit as u16) / 255) as u8
}

/// Colour of each pixel for `levels`: the key's colour, dimmed by its
/// intensity and by [`INDICATOR_RENDER_LIMIT`].
pub fn composite(levels: Levels) -> [RGB8; KEY_COUNT] {
    let mut pixels = [RGB8::default(); KEY_COUNT];
    for ((pixel, color), &level) in pixels.iter_mut().zip(INDICATOR_COLORS.iter()).zip(levels.iter()) {
        let gain = scale(level, INDICATOR_RENDER_LIMIT);
        *pixel = RGB8 {
            r: scale(color.r, gain),
            g: scale(color.g, gain),
            b: scale(color.b, gain),
        };
    }
    pixels
}

/// Pixels for an all-white frame at `level`, dimmed like [`composite`].
pub fn white(level: u8) -> [RGB8; KEY_COUNT] {
    let value = scale(level, INDICATOR_RENDER_LIMIT);
    [RGB8 {
        r: value,
        g: value,
        b: value,
    }; KEY_COUNT]
}
