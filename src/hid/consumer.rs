//! Consumer-control reports (usage page 0x0C): volume and media keys.
//!
//! Sent on their own interface next to the keyboard.  The report carries a
//! single 16-bit usage, so only one consumer key is down at a time.

pub const CONSUMER_REPORT_SIZE: usize = 2;

/// Consumer usages a macro can send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ConsumerUsage {
    PlayPause = 0x00CD,
    NextTrack = 0x00B5,
    PrevTrack = 0x00B6,
    Stop = 0x00B7,
    Mute = 0x00E2,
    VolumeUp = 0x00E9,
    VolumeDown = 0x00EA,
}

impl ConsumerUsage {
    pub const fn code(self) -> u16 {
        self as u16
    }
}

/// Consumer state as sent to the host. `usage` 0 means nothing is down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsumerReport {
    pub usage: u16,
}

impl ConsumerReport {
    pub const fn empty() -> Self {
        Self { usage: 0 }
    }

    pub const fn new(usage: ConsumerUsage) -> Self {
        Self { usage: usage.code() }
    }

    /// Whether `usage` is the key currently down.
    pub const fn holds(&self, usage: ConsumerUsage) -> bool {
        self.usage == usage.code()
    }

    /// Little-endian usage. Returns 0 if `buf` is too short.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < CONSUMER_REPORT_SIZE {
            return 0;
        }
        buf[..CONSUMER_REPORT_SIZE].copy_from_slice(&self.usage.to_le_bytes());
        CONSUMER_REPORT_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.usage == 0
    }
}

/// USB HID Report Descriptor for Consumer Control.
///
/// This is a minimal descriptor for a single 16-bit usage.
pub const CONSUMER_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x0C, // Usage Page (Consumer)
    0x09, 0x01, // Usage (Consumer Control)
    0xA1, 0x01, // Collection (Application)
    0x15, 0x00, //   Logical Minimum (0)
    0x26, 0xFF, 0x03, //   Logical Maximum (1023)
    0x19, 0x00, //   Usage Minimum (0)
    0x2A, 0xFF, 0x03, //   Usage Maximum (1023)
    0x75, 0x10, //   Report Size (16)
    0x95, 0x01, //   Report Count (1)
    0x81, 0x00, //   Input (Data, Array, Absolute)
    0xC0, // End Collection
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_holds_nothing() {
        let report = ConsumerReport::empty();
        assert!(report.is_empty());
        assert!(!report.holds(ConsumerUsage::Mute));
    }

    #[test]
    fn mute_report() {
        let report = ConsumerReport::new(ConsumerUsage::Mute);
        assert!(report.holds(ConsumerUsage::Mute));
        assert!(!report.holds(ConsumerUsage::VolumeUp));
        assert_eq!(report.usage, 0x00E2);
    }

    #[test]
    fn serialize_is_little_endian() {
        let mut buf = [0u8; 2];
        let len = ConsumerReport::new(ConsumerUsage::PlayPause).serialize(&mut buf);
        assert_eq!(len, 2);
        assert_eq!(buf, [0xCD, 0x00]);
    }

    #[test]
    fn serialize_into_short_buffer_writes_nothing() {
        let mut buf = [0u8; 1];
        assert_eq!(ConsumerReport::new(ConsumerUsage::Mute).serialize(&mut buf), 0);
    }
}
