//! Outgoing HID report queue.
//!
//! Key handlers run inside the synchronous poll loop, but the USB
//! endpoints are written asynchronously.  `ReportQueue` sits in between:
//! it tracks what is currently held down, turns every state change into a
//! full report, and buffers those reports (plus pauses) until the USB side
//! drains them after the poll.
//!
//! The last [`RELEASE_RESERVE`] slots are kept free for
//! [`release_all`](HidOutput::release_all), so a handler that overflows
//! the queue can always be followed by a release the host will see.

use heapless::Deque;

use super::consumer::{ConsumerReport, ConsumerUsage};
use super::keyboard::{stroke_for, KeyboardReport, Keycode};
use super::{HidOutput, HidReport};
use crate::config::REPORT_QUEUE_DEPTH;
use crate::Error;

/// Slots only `release_all` may use: one keyboard and one consumer report.
pub const RELEASE_RESERVE: usize = 2;

/// One entry of the outgoing queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidCommand {
    /// Send this report.
    Report(HidReport),
    /// Wait this many milliseconds before the next entry.
    Pause(u16),
}

/// Current HID state plus the reports not yet sent.
pub struct ReportQueue {
    keyboard: KeyboardReport,
    consumer: ConsumerReport,
    pending: Deque<HidCommand, REPORT_QUEUE_DEPTH>,
}

impl ReportQueue {
    pub const fn new() -> Self {
        Self {
            keyboard: KeyboardReport::empty(),
            consumer: ConsumerReport::empty(),
            pending: Deque::new(),
        }
    }

    /// Next entry to send, oldest first.
    pub fn pop(&mut self) -> Option<HidCommand> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Keyboard state as of the last queued report.
    pub fn keyboard(&self) -> &KeyboardReport {
        &self.keyboard
    }

    /// Consumer state as of the last queued report.
    pub fn consumer(&self) -> &ConsumerReport {
        &self.consumer
    }

    /// Reports restating the current keyboard and consumer state, for
    /// bringing the host back in sync after reports were lost.
    pub fn state_reports(&self) -> [HidReport; 2] {
        [
            HidReport::Keyboard(self.keyboard),
            HidReport::Consumer(self.consumer),
        ]
    }

    fn push(&mut self, command: HidCommand) -> Result<(), Error> {
        if self.pending.len() >= REPORT_QUEUE_DEPTH - RELEASE_RESERVE {
            return Err(Error::ReportQueueFull);
        }
        self.pending
            .push_back(command)
            .map_err(|_| Error::ReportQueueFull)
    }

    fn send_keyboard(&mut self, report: KeyboardReport) -> Result<(), Error> {
        self.push(HidCommand::Report(HidReport::Keyboard(report)))
    }

    fn send_consumer(&mut self, report: ConsumerReport) -> Result<(), Error> {
        self.push(HidCommand::Report(HidReport::Consumer(report)))
    }
}

impl Default for ReportQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl HidOutput for ReportQueue {
    fn init(&mut self) {
        self.keyboard = KeyboardReport::empty();
        self.consumer = ConsumerReport::empty();
        self.pending.clear();
    }

    fn press(&mut self, key: Keycode) -> Result<(), Error> {
        self.keyboard.press(key)?;
        self.send_keyboard(self.keyboard)
    }

    fn release(&mut self, key: Keycode) -> Result<(), Error> {
        self.keyboard.release(key);
        self.send_keyboard(self.keyboard)
    }

    fn consumer_press(&mut self, usage: ConsumerUsage) -> Result<(), Error> {
        self.consumer = ConsumerReport::new(usage);
        self.send_consumer(self.consumer)
    }

    fn consumer_release(&mut self, usage: ConsumerUsage) -> Result<(), Error> {
        if self.consumer.holds(usage) {
            self.consumer = ConsumerReport::empty();
        }
        self.send_consumer(self.consumer)
    }

    /// Sends the key together with shift in one report and restores the
    /// previous state in the next, so a held shift is left alone.
    fn type_char(&mut self, c: char) -> Result<(), Error> {
        let stroke = stroke_for(c).ok_or(Error::UnmappedChar(c))?;

        let held = self.keyboard;
        let mut down = held;
        if stroke.shift {
            down.press(Keycode::LEFT_SHIFT)?;
        }
        // A key that is already held needs a release first or the host
        // sees no new key.
        if down.is_down(stroke.key) {
            down.release(stroke.key);
            self.send_keyboard(down)?;
        }
        down.press(stroke.key)?;
        self.send_keyboard(down)?;

        self.send_keyboard(held)
    }

    fn pause(&mut self, ms: u16) -> Result<(), Error> {
        self.push(HidCommand::Pause(ms))
    }

    /// Uses the reserved slots.  If an earlier `release_all` already took
    /// them, the newest entries are discarded to make room: whatever they
    /// pressed is released here anyway.
    fn release_all(&mut self) -> Result<(), Error> {
        self.keyboard = KeyboardReport::empty();
        self.consumer = ConsumerReport::empty();

        while self.pending.len() > REPORT_QUEUE_DEPTH - RELEASE_RESERVE {
            self.pending.pop_back();
        }
        for report in self.state_reports() {
            self.pending
                .push_back(HidCommand::Report(report))
                .map_err(|_| Error::ReportQueueFull)?;
        }
        Ok(())
    }
}
