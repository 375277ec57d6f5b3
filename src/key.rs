//! Per-key edge detection.
//!
//! Each physical key is sampled once per poll and turned into exactly one
//! [`KeyEvent`].  Inputs are active-low (pulled up, switch to ground), so a
//! raw level of `false` means "pressed".
//!
//! By default there is no explicit debounce filter: the poll interval
//! itself is the only defence against contact bounce, and chatter shorter
//! than one poll is simply never seen.  Bounce that straddles a poll
//! boundary *will* show up as an extra release/press pair.  Boards with
//! noisy switches can opt into a counter filter with
//! [`KeyChannel::with_debounce`].

use crate::config::KEY_COUNT;

/// Source of raw key levels (GPIO inputs with pull-ups).
pub trait KeyInputs {
    /// Raw level of `key` right now. `false` means pressed.
    fn level(&mut self, key: usize) -> bool;
}

/// Fixed levels, mostly for tests and simulations.
impl KeyInputs for [bool; KEY_COUNT] {
    fn level(&mut self, key: usize) -> bool {
        self[key]
    }
}

/// Transition reported for one key on one poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Not pressed, and was not pressed last poll.
    NoChange,
    /// Went down this poll. Reported once per press.
    PressedEdge,
    /// Still down, repeated on every poll after the press.
    StillHeld,
    /// Came back up this poll.
    ReleasedEdge,
}

/// State of one physical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyChannel {
    /// Logical state accepted on the previous poll (`true` = pressed).
    pressed: bool,
    /// Consecutive polls the raw level has disagreed with `pressed`.
    pending: u8,
    /// Disagreeing polls needed to accept an edge.
    threshold: u8,
}

impl KeyChannel {
    /// A released key that reports edges on the first differing sample.
    pub const fn new() -> Self {
        Self {
            pressed: false,
            pending: 0,
            threshold: 1,
        }
    }

    /// A released key that only accepts an edge after `polls` consecutive
    /// samples disagree with the current state.
    ///
    /// `polls` of 0 or 1 behaves exactly like [`KeyChannel::new`].
    pub const fn with_debounce(polls: u8) -> Self {
        Self {
            pressed: false,
            pending: 0,
            threshold: if polls == 0 { 1 } else { polls },
        }
    }

    /// Whether the key is logically down.
    pub const fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feed this poll's raw (active-low) level and get the transition.
    ///
    /// The logical state is updated at most once per call.
    pub fn update(&mut self, raw_level: bool) -> KeyEvent {
        let now_pressed = !raw_level;

        if now_pressed != self.pressed {
            self.pending = self.pending.saturating_add(1);
            if self.pending >= self.threshold {
                self.pending = 0;
                self.pressed = now_pressed;
                return if now_pressed {
                    KeyEvent::PressedEdge
                } else {
                    KeyEvent::ReleasedEdge
                };
            }
        } else {
            self.pending = 0;
        }

        if self.pressed {
            KeyEvent::StillHeld
        } else {
            KeyEvent::NoChange
        }
    }
}

impl Default for KeyChannel {
    fn default() -> Self {
        Self::new()
    }
}
