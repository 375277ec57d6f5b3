//! Unit tests for HID report building and the outgoing queue.
//!
//! These tests run on the host (not embedded) and verify the pure
//! logic of report state, character mapping and queueing.

use super::consumer::{ConsumerReport, ConsumerUsage};
use super::keyboard::{stroke_for, KeyboardReport, Keycode, Stroke};
use super::queue::{HidCommand, ReportQueue, RELEASE_RESERVE};
use super::{HidOutput, HidReport};
use crate::config::REPORT_QUEUE_DEPTH;
use crate::Error;

fn drain(queue: &mut ReportQueue) -> Vec<HidCommand> {
    core::iter::from_fn(|| queue.pop()).collect()
}

fn kb(modifier: u8, keys: &[u8]) -> HidCommand {
    let mut keycodes = [0u8; 6];
    keycodes[..keys.len()].copy_from_slice(keys);
    HidCommand::Report(HidReport::Keyboard(KeyboardReport {
        modifier,
        reserved: 0,
        keycodes,
    }))
}

fn cc(usage: u16) -> HidCommand {
    HidCommand::Report(HidReport::Consumer(ConsumerReport { usage }))
}

// ═══════════════════════════════════════════════════════════════════════════
// Keyboard Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keyboard_report_empty() {
    let report = KeyboardReport::empty();
    assert!(report.is_empty());
    assert_eq!(report.modifier, 0);
    assert_eq!(report.keycodes, [0; 6]);
}

#[test]
fn modifiers_go_to_modifier_byte() {
    let mut report = KeyboardReport::empty();
    report.press(Keycode::LEFT_CTRL).unwrap();
    report.press(Keycode::RIGHT_GUI).unwrap();
    assert_eq!(report.modifier, 0x81);
    assert_eq!(report.keycodes, [0; 6]);

    report.release(Keycode::LEFT_CTRL);
    assert_eq!(report.modifier, 0x80);
}

#[test]
fn press_fills_free_slots_in_order() {
    let mut report = KeyboardReport::empty();
    report.press(Keycode::A).unwrap();
    report.press(Keycode::B).unwrap();
    report.release(Keycode::A);
    report.press(Keycode::C).unwrap();
    assert_eq!(report.keycodes, [0x06, 0x05, 0, 0, 0, 0]);
}

#[test]
fn press_twice_uses_one_slot() {
    let mut report = KeyboardReport::empty();
    report.press(Keycode::DELETE).unwrap();
    report.press(Keycode::DELETE).unwrap();
    assert_eq!(report.keycodes.iter().filter(|&&k| k != 0).count(), 1);
}

#[test]
fn seventh_key_is_rollover_error() {
    let mut report = KeyboardReport::empty();
    for code in 0x04..0x0A {
        report.press(Keycode(code)).unwrap();
    }
    assert_eq!(report.press(Keycode(0x0A)), Err(Error::RolloverFull));
    assert_eq!(report.keycodes, [0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
}

#[test]
fn keyboard_report_serialize() {
    let report = KeyboardReport {
        modifier: 0x05,
        reserved: 0x00,
        keycodes: [0x04, 0x05, 0x06, 0x00, 0x00, 0x00],
    };

    let mut buf = [0u8; 8];
    let written = report.serialize(&mut buf);

    assert_eq!(written, 8);
    assert_eq!(buf, [0x05, 0x00, 0x04, 0x05, 0x06, 0x00, 0x00, 0x00]);
}

#[test]
fn keyboard_report_serialize_buffer_too_small() {
    let report = KeyboardReport::empty();
    let mut small_buf = [0u8; 4];
    let written = report.serialize(&mut small_buf);
    assert_eq!(written, 0); // Should fail gracefully
}

// ═══════════════════════════════════════════════════════════════════════════
// Character Map Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn letters_and_digits() {
    assert_eq!(stroke_for('a'), Some(Stroke { key: Keycode::A, shift: false }));
    assert_eq!(stroke_for('Z'), Some(Stroke { key: Keycode::Z, shift: true }));
    assert_eq!(stroke_for('1').map(|s| s.key), Some(Keycode(0x1E)));
    assert_eq!(stroke_for('0').map(|s| s.key), Some(Keycode(0x27)));
}

#[test]
fn punctuation_shares_keys_with_shift() {
    let minus = stroke_for('-').unwrap();
    let under = stroke_for('_').unwrap();
    assert_eq!(minus.key, under.key);
    assert!(!minus.shift);
    assert!(under.shift);
}

#[test]
fn control_characters() {
    assert_eq!(stroke_for('\n').map(|s| s.key), Some(Keycode::RETURN));
    assert_eq!(stroke_for('\t').map(|s| s.key), Some(Keycode::TAB));
    assert_eq!(stroke_for(' ').map(|s| s.key), Some(Keycode::SPACE));
}

#[test]
fn non_ascii_is_unmapped() {
    assert_eq!(stroke_for('é'), None);
    assert_eq!(stroke_for('\u{7f}'), None);
}

// ═══════════════════════════════════════════════════════════════════════════
// Report Queue Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn press_and_release_queue_full_reports() {
    let mut q = ReportQueue::new();
    q.press(Keycode::LEFT_CTRL).unwrap();
    q.press(Keycode::LEFT_ALT).unwrap();
    q.press(Keycode::DELETE).unwrap();
    q.release(Keycode::DELETE).unwrap();

    assert_eq!(
        drain(&mut q),
        [kb(0x01, &[]), kb(0x05, &[]), kb(0x05, &[0x4C]), kb(0x05, &[])]
    );
    assert!(q.is_empty());
}

#[test]
fn tap_is_press_then_release() {
    let mut q = ReportQueue::new();
    q.tap(Keycode::RETURN).unwrap();
    assert_eq!(drain(&mut q), [kb(0, &[0x28]), kb(0, &[])]);
}

#[test]
fn type_text_two_reports_per_char() {
    let mut q = ReportQueue::new();
    q.type_text("aB").unwrap();
    assert_eq!(
        drain(&mut q),
        [kb(0, &[0x04]), kb(0, &[]), kb(0x02, &[0x05]), kb(0, &[])]
    );
}

#[test]
fn type_text_keeps_held_modifier() {
    let mut q = ReportQueue::new();
    q.press(Keycode::LEFT_GUI).unwrap();
    q.type_char('t').unwrap();
    assert_eq!(
        drain(&mut q),
        [kb(0x08, &[]), kb(0x08, &[0x17]), kb(0x08, &[])]
    );
    assert!(q.keyboard().is_down(Keycode::LEFT_GUI));
}

#[test]
fn type_char_of_held_key_retriggers() {
    let mut q = ReportQueue::new();
    q.press(Keycode::A).unwrap();
    q.type_char('a').unwrap();
    assert_eq!(
        drain(&mut q),
        [kb(0, &[0x04]), kb(0, &[]), kb(0, &[0x04]), kb(0, &[0x04])]
    );
}

#[test]
fn type_text_stops_at_unmapped_char() {
    let mut q = ReportQueue::new();
    assert_eq!(q.type_text("aéb"), Err(Error::UnmappedChar('é')));
    assert_eq!(q.len(), 2);
}

#[test]
fn consumer_press_release() {
    let mut q = ReportQueue::new();
    q.consumer_press(ConsumerUsage::Mute).unwrap();
    assert!(q.consumer().holds(ConsumerUsage::Mute));
    q.consumer_release(ConsumerUsage::Mute).unwrap();
    assert_eq!(drain(&mut q), [cc(0x00E2), cc(0)]);
}

#[test]
fn consumer_release_of_other_usage_keeps_current() {
    let mut q = ReportQueue::new();
    q.consumer_press(ConsumerUsage::VolumeUp).unwrap();
    q.consumer_release(ConsumerUsage::Mute).unwrap();
    assert_eq!(drain(&mut q), [cc(0x00E9), cc(0x00E9)]);
}

#[test]
fn pause_is_queued_in_order() {
    let mut q = ReportQueue::new();
    q.tap(Keycode::T).unwrap();
    q.pause(500).unwrap();
    q.tap(Keycode::RETURN).unwrap();

    let commands = drain(&mut q);
    assert_eq!(commands[2], HidCommand::Pause(500));
    assert_eq!(commands.len(), 5);
}

#[test]
fn release_all_clears_both_interfaces() {
    let mut q = ReportQueue::new();
    q.press(Keycode::LEFT_SHIFT).unwrap();
    q.press(Keycode::X).unwrap();
    q.consumer_press(ConsumerUsage::PlayPause).unwrap();
    q.release_all().unwrap();

    let commands = drain(&mut q);
    assert_eq!(&commands[3..], [kb(0, &[]), cc(0)]);
    assert!(q.keyboard().is_empty());
    assert!(q.consumer().is_empty());
}

#[test]
fn full_queue_reports_error() {
    let mut q = ReportQueue::new();
    for _ in 0..REPORT_QUEUE_DEPTH - RELEASE_RESERVE {
        q.pause(1).unwrap();
    }
    assert_eq!(q.pause(1), Err(Error::ReportQueueFull));
    assert_eq!(q.press(Keycode::A), Err(Error::ReportQueueFull));
    assert_eq!(q.len(), REPORT_QUEUE_DEPTH - RELEASE_RESERVE);
}

#[test]
fn release_all_fits_after_overflow() {
    let mut q = ReportQueue::new();
    q.consumer_press(ConsumerUsage::VolumeUp).unwrap();
    // Typing fills the queue and fails part-way with 'a' still down.
    let text = "a".repeat(REPORT_QUEUE_DEPTH);
    assert_eq!(q.type_text(&text), Err(Error::ReportQueueFull));
    q.release_all().unwrap();

    let commands = drain(&mut q);
    assert_eq!(commands.len(), REPORT_QUEUE_DEPTH);
    assert_eq!(&commands[REPORT_QUEUE_DEPTH - 2..], [kb(0, &[]), cc(0)]);
}

#[test]
fn repeated_release_all_overwrites_newest_entries() {
    let mut q = ReportQueue::new();
    while q.press(Keycode::B).and_then(|_| q.release(Keycode::B)).is_ok() {}
    q.release_all().unwrap();
    q.release_all().unwrap();

    let commands = drain(&mut q);
    assert_eq!(commands.len(), REPORT_QUEUE_DEPTH);
    assert_eq!(&commands[REPORT_QUEUE_DEPTH - 2..], [kb(0, &[]), cc(0)]);
}

#[test]
fn state_reports_restate_held_keys() {
    let mut q = ReportQueue::new();
    q.press(Keycode::LEFT_CTRL).unwrap();
    q.press(Keycode::DELETE).unwrap();
    q.consumer_press(ConsumerUsage::Mute).unwrap();
    let [keyboard, consumer] = q.state_reports();
    assert_eq!(HidCommand::Report(keyboard), kb(0x01, &[0x4C]));
    assert_eq!(HidCommand::Report(consumer), cc(0x00E2));
}

#[test]
fn init_drops_pending_and_state() {
    let mut q = ReportQueue::new();
    q.press(Keycode::A).unwrap();
    q.consumer_press(ConsumerUsage::Stop).unwrap();
    q.init();
    assert!(q.is_empty());
    assert!(q.keyboard().is_empty());
    assert!(q.consumer().is_empty());
}

#[test]
fn report_serialize_dispatches_by_kind() {
    let mut buf = [0u8; 8];
    let keyboard = HidReport::Keyboard(KeyboardReport::empty());
    let consumer = HidReport::Consumer(ConsumerReport::new(ConsumerUsage::Mute));
    assert_eq!(keyboard.serialize(&mut buf), 8);
    assert_eq!(consumer.serialize(&mut buf), 2);
    assert_eq!(&buf[..2], [0xE2, 0x00]);
}
