//! HID report types and the emulation interface key handlers talk to.

pub mod consumer;
pub mod keyboard;
pub mod queue;

#[cfg(test)]
mod tests;

use crate::Error;
use consumer::{ConsumerReport, ConsumerUsage};
use keyboard::{stroke_for, KeyboardReport, Keycode};

/// A report for one of the two HID interfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Consumer(ConsumerReport),
}

impl HidReport {
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        match self {
            HidReport::Keyboard(k) => k.serialize(buf),
            HidReport::Consumer(c) => c.serialize(buf),
        }
    }
}

/// Keyboard and consumer-control emulation.
///
/// Calls are synchronous from the caller's point of view and may be slow
/// (text injection emits two reports per character).
pub trait HidOutput {
    /// Reset to "nothing pressed" before first use.
    fn init(&mut self);

    fn press(&mut self, key: Keycode) -> Result<(), Error>;

    fn release(&mut self, key: Keycode) -> Result<(), Error>;

    fn tap(&mut self, key: Keycode) -> Result<(), Error> {
        self.press(key)?;
        self.release(key)
    }

    fn consumer_press(&mut self, usage: ConsumerUsage) -> Result<(), Error>;

    fn consumer_release(&mut self, usage: ConsumerUsage) -> Result<(), Error>;

    fn consumer_tap(&mut self, usage: ConsumerUsage) -> Result<(), Error> {
        self.consumer_press(usage)?;
        self.consumer_release(usage)
    }

    /// Type one character (US layout), shifting if needed.
    fn type_char(&mut self, c: char) -> Result<(), Error> {
        let stroke = stroke_for(c).ok_or(Error::UnmappedChar(c))?;
        if stroke.shift {
            self.press(Keycode::LEFT_SHIFT)?;
        }
        self.tap(stroke.key)?;
        if stroke.shift {
            self.release(Keycode::LEFT_SHIFT)?;
        }
        Ok(())
    }

    /// Type `text` one character at a time.  Stops at the first character
    /// that cannot be typed.
    fn type_text(&mut self, text: &str) -> Result<(), Error> {
        text.chars().try_for_each(|c| self.type_char(c))
    }

    /// Hold off further reports for `ms` milliseconds.
    fn pause(&mut self, ms: u16) -> Result<(), Error>;

    /// Release every keyboard and consumer key.
    fn release_all(&mut self) -> Result<(), Error>;
}
