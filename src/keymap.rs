//! Default key bindings.  Customize your macro pad here.
//!
//! - Key 1: open a terminal (GUI+T) and type a shutdown command.
//! - Key 2: Ctrl+Alt+Del, held for as long as the key is held.
//! - Key 3: Volume Mute (consumer control).

use crate::action::{Action, Macro};
use crate::config::KEY_COUNT;
use crate::hid::consumer::ConsumerUsage;
use crate::hid::keyboard::Keycode;

/// Time for the terminal window to open before typing (ms).
const TERMINAL_OPEN_MS: u16 = 500;

static KEY1_PRESSED: [Action; 6] = [
    Action::Press(Keycode::LEFT_GUI),
    Action::Tap(Keycode::T),
    Action::Release(Keycode::LEFT_GUI),
    Action::Pause(TERMINAL_OPEN_MS),
    Action::Type("sudo shutdown -h now"),
    Action::Tap(Keycode::RETURN),
];

static KEY2_PRESSED: [Action; 3] = [
    Action::Press(Keycode::LEFT_CTRL),
    Action::Press(Keycode::LEFT_ALT),
    Action::Press(Keycode::DELETE),
];

static KEY2_RELEASED: [Action; 3] = [
    Action::Release(Keycode::DELETE),
    Action::Release(Keycode::LEFT_ALT),
    Action::Release(Keycode::LEFT_CTRL),
];

static KEY3_PRESSED: [Action; 1] = [Action::ConsumerPress(ConsumerUsage::Mute)];
static KEY3_RELEASED: [Action; 1] = [Action::ConsumerRelease(ConsumerUsage::Mute)];

/// Bindings for keys 1 to 3.
pub fn default_keymap() -> [Macro; KEY_COUNT] {
    [
        Macro::on_press(&KEY1_PRESSED),
        Macro::press_release(&KEY2_PRESSED, &KEY2_RELEASED),
        Macro::press_release(&KEY3_PRESSED, &KEY3_RELEASED),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::KeyHandler;
    use crate::hid::queue::{HidCommand, ReportQueue};
    use crate::hid::HidOutput;

    #[test]
    fn shutdown_macro_waits_for_terminal() {
        let mut keys = default_keymap();
        let mut hid = ReportQueue::new();
        keys[0].on_pressed(&mut hid).unwrap();

        let commands: Vec<_> = core::iter::from_fn(|| hid.pop()).collect();
        let pause = commands
            .iter()
            .position(|c| *c == HidCommand::Pause(TERMINAL_OPEN_MS))
            .expect("pause queued");
        // GUI down, GUI+T, GUI, GUI up before the pause.
        assert_eq!(pause, 4);
        // 20 characters at two reports each, then Return down/up.
        assert_eq!(commands.len() - pause - 1, 20 * 2 + 2);
        assert!(hid.keyboard().is_empty());
    }

    #[test]
    fn ctrl_alt_del_held_until_release() {
        let mut keys = default_keymap();
        let mut hid = ReportQueue::new();

        keys[1].on_pressed(&mut hid).unwrap();
        keys[1].on_held(&mut hid).unwrap();
        assert_eq!(hid.keyboard().modifier, 0x05);
        assert!(hid.keyboard().is_down(Keycode::DELETE));

        keys[1].on_released(&mut hid).unwrap();
        assert!(hid.keyboard().is_empty());
    }

    #[test]
    fn mute_follows_key() {
        let mut keys = default_keymap();
        let mut hid = ReportQueue::new();
        hid.init();

        keys[2].on_pressed(&mut hid).unwrap();
        assert!(hid.consumer().holds(ConsumerUsage::Mute));
        keys[2].on_released(&mut hid).unwrap();
        assert!(hid.consumer().is_empty());
    }
}
