//! USB HID keyboard report (boot protocol compatible) and key codes.
//!
//! Layout (8 bytes):
//! ```text
//! Byte 0: Modifier keys (bitfield)
//!         Bit 0 = Left Ctrl,  Bit 1 = Left Shift,
//!         Bit 2 = Left Alt,   Bit 3 = Left GUI,
//!         Bit 4 = Right Ctrl, Bit 5 = Right Shift,
//!         Bit 6 = Right Alt,  Bit 7 = Right GUI
//! Byte 1: Reserved (0x00)
//! Byte 2-7: Up to 6 simultaneous key codes (USB HID usage codes)
//! ```

use crate::Error;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

/// A USB HID keyboard usage (page 0x07).
///
/// Usages 0xE0..=0xE7 are the modifier keys; they travel in the modifier
/// byte rather than in a key slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keycode(pub u8);

impl Keycode {
    pub const A: Self = Self(0x04);
    pub const B: Self = Self(0x05);
    pub const C: Self = Self(0x06);
    pub const D: Self = Self(0x07);
    pub const E: Self = Self(0x08);
    pub const F: Self = Self(0x09);
    pub const G: Self = Self(0x0A);
    pub const H: Self = Self(0x0B);
    pub const I: Self = Self(0x0C);
    pub const J: Self = Self(0x0D);
    pub const K: Self = Self(0x0E);
    pub const L: Self = Self(0x0F);
    pub const M: Self = Self(0x10);
    pub const N: Self = Self(0x11);
    pub const O: Self = Self(0x12);
    pub const P: Self = Self(0x13);
    pub const Q: Self = Self(0x14);
    pub const R: Self = Self(0x15);
    pub const S: Self = Self(0x16);
    pub const T: Self = Self(0x17);
    pub const U: Self = Self(0x18);
    pub const V: Self = Self(0x19);
    pub const W: Self = Self(0x1A);
    pub const X: Self = Self(0x1B);
    pub const Y: Self = Self(0x1C);
    pub const Z: Self = Self(0x1D);

    pub const RETURN: Self = Self(0x28);
    pub const ESCAPE: Self = Self(0x29);
    pub const BACKSPACE: Self = Self(0x2A);
    pub const TAB: Self = Self(0x2B);
    pub const SPACE: Self = Self(0x2C);

    pub const F1: Self = Self(0x3A);
    pub const F2: Self = Self(0x3B);
    pub const F3: Self = Self(0x3C);
    pub const F4: Self = Self(0x3D);
    pub const F5: Self = Self(0x3E);
    pub const F6: Self = Self(0x3F);
    pub const F7: Self = Self(0x40);
    pub const F8: Self = Self(0x41);
    pub const F9: Self = Self(0x42);
    pub const F10: Self = Self(0x43);
    pub const F11: Self = Self(0x44);
    pub const F12: Self = Self(0x45);

    pub const PRINT_SCREEN: Self = Self(0x46);
    pub const INSERT: Self = Self(0x49);
    pub const HOME: Self = Self(0x4A);
    pub const PAGE_UP: Self = Self(0x4B);
    pub const DELETE: Self = Self(0x4C);
    pub const END: Self = Self(0x4D);
    pub const PAGE_DOWN: Self = Self(0x4E);
    pub const RIGHT_ARROW: Self = Self(0x4F);
    pub const LEFT_ARROW: Self = Self(0x50);
    pub const DOWN_ARROW: Self = Self(0x51);
    pub const UP_ARROW: Self = Self(0x52);

    pub const LEFT_CTRL: Self = Self(0xE0);
    pub const LEFT_SHIFT: Self = Self(0xE1);
    pub const LEFT_ALT: Self = Self(0xE2);
    pub const LEFT_GUI: Self = Self(0xE3);
    pub const RIGHT_CTRL: Self = Self(0xE4);
    pub const RIGHT_SHIFT: Self = Self(0xE5);
    pub const RIGHT_ALT: Self = Self(0xE6);
    pub const RIGHT_GUI: Self = Self(0xE7);

    pub const fn is_modifier(self) -> bool {
        self.0 >= 0xE0 && self.0 <= 0xE7
    }

    /// Bit of this key in the modifier byte, or 0 for ordinary keys.
    pub const fn modifier_bit(self) -> u8 {
        if self.is_modifier() {
            1 << (self.0 - 0xE0)
        } else {
            0
        }
    }
}

/// One key stroke needed to type a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stroke {
    pub key: Keycode,
    pub shift: bool,
}

impl Stroke {
    const fn plain(code: u8) -> Option<Self> {
        Some(Self {
            key: Keycode(code),
            shift: false,
        })
    }

    const fn shifted(code: u8) -> Option<Self> {
        Some(Self {
            key: Keycode(code),
            shift: true,
        })
    }
}

/// Map a character to its stroke on a US layout host.
///
/// Covers printable ASCII plus `\n` (Return) and `\t` (Tab).
pub fn stroke_for(c: char) -> Option<Stroke> {
    match c {
        'a'..='z' => Stroke::plain(0x04 + (c as u8 - b'a')),
        'A'..='Z' => Stroke::shifted(0x04 + (c as u8 - b'A')),
        '1'..='9' => Stroke::plain(0x1E + (c as u8 - b'1')),
        '0' => Stroke::plain(0x27),
        '!' => Stroke::shifted(0x1E),
        '@' => Stroke::shifted(0x1F),
        '#' => Stroke::shifted(0x20),
        '$' => Stroke::shifted(0x21),
        '%' => Stroke::shifted(0x22),
        '^' => Stroke::shifted(0x23),
        '&' => Stroke::shifted(0x24),
        '*' => Stroke::shifted(0x25),
        '(' => Stroke::shifted(0x26),
        ')' => Stroke::shifted(0x27),
        '\n' => Stroke::plain(0x28),
        '\t' => Stroke::plain(0x2B),
        ' ' => Stroke::plain(0x2C),
        '-' => Stroke::plain(0x2D),
        '_' => Stroke::shifted(0x2D),
        '=' => Stroke::plain(0x2E),
        '+' => Stroke::shifted(0x2E),
        '[' => Stroke::plain(0x2F),
        '{' => Stroke::shifted(0x2F),
        ']' => Stroke::plain(0x30),
        '}' => Stroke::shifted(0x30),
        '\\' => Stroke::plain(0x31),
        '|' => Stroke::shifted(0x31),
        ';' => Stroke::plain(0x33),
        ':' => Stroke::shifted(0x33),
        '\'' => Stroke::plain(0x34),
        '"' => Stroke::shifted(0x34),
        '`' => Stroke::plain(0x35),
        '~' => Stroke::shifted(0x35),
        ',' => Stroke::plain(0x36),
        '<' => Stroke::shifted(0x36),
        '.' => Stroke::plain(0x37),
        '>' => Stroke::shifted(0x37),
        '/' => Stroke::plain(0x38),
        '?' => Stroke::shifted(0x38),
        _ => None,
    }
}

/// Standard USB HID boot-protocol keyboard report.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    /// Modifier key bitfield.
    pub modifier: u8,
    /// Reserved byte (always 0x00 per HID spec).
    pub reserved: u8,
    /// Up to 6 simultaneously pressed key codes.
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// Create an empty (all-keys-released) report.
    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// Mark `key` as down. Pressing a key that is already down is a no-op.
    pub fn press(&mut self, key: Keycode) -> Result<(), Error> {
        if key.is_modifier() {
            self.modifier |= key.modifier_bit();
            return Ok(());
        }
        if key.0 == 0 || self.is_down(key) {
            return Ok(());
        }
        let slot = self
            .keycodes
            .iter_mut()
            .find(|code| **code == 0)
            .ok_or(Error::RolloverFull)?;
        *slot = key.0;
        Ok(())
    }

    /// Mark `key` as up. Releasing a key that is not down is a no-op.
    pub fn release(&mut self, key: Keycode) {
        if key.is_modifier() {
            self.modifier &= !key.modifier_bit();
            return;
        }
        for code in self.keycodes.iter_mut().filter(|code| **code == key.0) {
            *code = 0;
        }
    }

    /// Whether `key` is currently down in this report.
    pub fn is_down(&self, key: Keycode) -> bool {
        if key.is_modifier() {
            self.modifier & key.modifier_bit() != 0
        } else {
            key.0 != 0 && self.keycodes.contains(&key.0)
        }
    }

    /// Serialise into a byte slice for USB HID transmission.
    /// Returns the number of bytes written (always 8).
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    /// Returns `true` if no keys are pressed (release event).
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

// USB HID report descriptor for a boot-protocol keyboard

/// USB HID Report Descriptor for a standard keyboard.
///
/// This descriptor tells the USB host that we are a keyboard with:
///   - 8 modifier key bits (input)
///   - 1 reserved byte
///   - 5 LED indicators (output)
///   - 6 key code bytes (input)
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x06, // Usage (Keyboard)
    0xA1, 0x01, // Collection (Application)
    //
    //   - Modifier keys (8 bits) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0xE0, //   Usage Minimum (Left Control)
    0x29, 0xE7, //   Usage Maximum (Right GUI)
    0x15, 0x00, //   Logical Minimum (0)
    0x25, 0x01, //   Logical Maximum (1)
    0x75, 0x01, //   Report Size (1)
    0x95, 0x08, //   Report Count (8)
    0x81, 0x02, //   Input (Data, Variable, Absolute)
    //
    //   - Reserved byte -
    0x95, 0x01, //   Report Count (1)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x01, //   Input (Constant) - padding
    //
    //   - LED output (5 bits + 3 padding) -
    0x05, 0x08, //   Usage Page (LEDs)
    0x19, 0x01, //   Usage Minimum (Num Lock)
    0x29, 0x05, //   Usage Maximum (Kana)
    0x95, 0x05, //   Report Count (5)
    0x75, 0x01, //   Report Size (1)
    0x91, 0x02, //   Output (Data, Variable, Absolute)
    0x95, 0x01, //   Report Count (1)
    0x75, 0x03, //   Report Size (3)
    0x91, 0x01, //   Output (Constant) - padding
    //
    //   - Key codes (6 bytes) -
    0x05, 0x07, //   Usage Page (Keyboard/Keypad)
    0x19, 0x00, //   Usage Minimum (0)
    0x29, 0xFF, //   Usage Maximum (255)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x00, // Logical Maximum (255)
    0x95, 0x06, //   Report Count (6)
    0x75, 0x08, //   Report Size (8)
    0x81, 0x00, //   Input (Data, Array)
    //
    0xC0, // End Collection
];
