//! What a key does.
//!
//! Each key has one [`KeyHandler`], called from the poll loop on the
//! transitions reported by its [`KeyChannel`](crate::key::KeyChannel):
//!
//! | event          | handler        |
//! |----------------|----------------|
//! | `PressedEdge`  | `on_pressed`   |
//! | `StillHeld`    | `on_held`      |
//! | `ReleasedEdge` | `on_released`  |
//! | `NoChange`     | nothing        |
//!
//! Handlers may be slow (typing a whole command line, pausing for a window
//! to open).  The poll loop renders the indicators before calling
//! `on_pressed` so the light never waits on the handler.
//!
//! Most keys are plain [`Macro`]s: three static lists of [`Action`] steps.

use crate::hid::consumer::ConsumerUsage;
use crate::hid::keyboard::Keycode;
use crate::hid::HidOutput;
use crate::key::KeyEvent;
use crate::Error;

/// User behaviour bound to one key.  All methods default to doing nothing.
pub trait KeyHandler {
    fn on_pressed<H: HidOutput>(&mut self, hid: &mut H) -> Result<(), Error> {
        let _ = hid;
        Ok(())
    }

    fn on_held<H: HidOutput>(&mut self, hid: &mut H) -> Result<(), Error> {
        let _ = hid;
        Ok(())
    }

    fn on_released<H: HidOutput>(&mut self, hid: &mut H) -> Result<(), Error> {
        let _ = hid;
        Ok(())
    }
}

/// Route `event` to the matching handler method.
pub fn dispatch<K: KeyHandler, H: HidOutput>(
    handler: &mut K,
    event: KeyEvent,
    hid: &mut H,
) -> Result<(), Error> {
    match event {
        KeyEvent::NoChange => Ok(()),
        KeyEvent::PressedEdge => handler.on_pressed(hid),
        KeyEvent::StillHeld => handler.on_held(hid),
        KeyEvent::ReleasedEdge => handler.on_released(hid),
    }
}

/// One step of a macro.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Press(Keycode),
    Release(Keycode),
    Tap(Keycode),
    ConsumerPress(ConsumerUsage),
    ConsumerRelease(ConsumerUsage),
    ConsumerTap(ConsumerUsage),
    /// Type a string on a US layout host.
    Type(&'static str),
    /// Wait before the next step (milliseconds).
    Pause(u16),
    ReleaseAll,
}

impl Action {
    pub fn perform<H: HidOutput>(&self, hid: &mut H) -> Result<(), Error> {
        match *self {
            Action::Press(key) => hid.press(key),
            Action::Release(key) => hid.release(key),
            Action::Tap(key) => hid.tap(key),
            Action::ConsumerPress(usage) => hid.consumer_press(usage),
            Action::ConsumerRelease(usage) => hid.consumer_release(usage),
            Action::ConsumerTap(usage) => hid.consumer_tap(usage),
            Action::Type(text) => hid.type_text(text),
            Action::Pause(ms) => hid.pause(ms),
            Action::ReleaseAll => hid.release_all(),
        }
    }
}

/// Run `actions` in order, stopping at the first failure.
pub fn run<H: HidOutput>(actions: &[Action], hid: &mut H) -> Result<(), Error> {
    actions.iter().try_for_each(|action| action.perform(hid))
}

/// A key defined by static action lists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Macro {
    pub pressed: &'static [Action],
    pub held: &'static [Action],
    pub released: &'static [Action],
}

impl Macro {
    /// A key that does nothing.
    pub const NONE: Self = Self {
        pressed: &[],
        held: &[],
        released: &[],
    };

    /// Runs `actions` once on press.
    pub const fn on_press(actions: &'static [Action]) -> Self {
        Self {
            pressed: actions,
            held: &[],
            released: &[],
        }
    }

    /// Runs `down` on press and `up` on release.
    pub const fn press_release(down: &'static [Action], up: &'static [Action]) -> Self {
        Self {
            pressed: down,
            held: &[],
            released: up,
        }
    }
}

impl KeyHandler for Macro {
    fn on_pressed<H: HidOutput>(&mut self, hid: &mut H) -> Result<(), Error> {
        run(self.pressed, hid)
    }

    fn on_held<H: HidOutput>(&mut self, hid: &mut H) -> Result<(), Error> {
        run(self.held, hid)
    }

    fn on_released<H: HidOutput>(&mut self, hid: &mut H) -> Result<(), Error> {
        run(self.released, hid)
    }
}
