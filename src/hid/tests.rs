//! Unit tests for HID reports and the report-backed actuator.
//!
//! These tests run on the host (not embedded) and check report state
//! tracking, wire bytes and which reports reach the output.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use super::consumer::{ConsumerReport, ConsumerUsage};
use super::keyboard::{keycode, KeyboardReport};
use super::mouse::{button, MouseReport};
use super::{HidOutput, HidReport, ReportActuator};
use crate::action::Actuator;

#[derive(Default)]
struct Captured {
    reports: Vec<HidReport>,
    tones: Vec<Option<u16>>,
    files: Vec<String>,
}

impl HidOutput for Captured {
    fn send(&mut self, report: HidReport) {
        self.reports.push(report);
    }

    fn tone(&mut self, freq: Option<u16>) {
        self.tones.push(freq);
    }

    fn play_file(&mut self, path: &str) {
        self.files.push(path.into());
    }
}

fn actuator() -> ReportActuator<Captured> {
    ReportActuator::new(Captured::default())
}

fn keys(report: &HidReport) -> (u8, [u8; 6]) {
    match report {
        HidReport::Keyboard(kb) => (kb.modifier, kb.keycodes),
        other => panic!("expected keyboard report, got {:?}", other),
    }
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
fn keyboard_modifiers_fold_into_bitfield() {
    let mut report = KeyboardReport::empty();
    assert!(report.press(keycode::LEFT_CTRL));
    assert!(report.press(keycode::LEFT_SHIFT));
    assert_eq!(report.modifier, 0x03);
    assert_eq!(report.keycodes, [0; 6]);
    assert!(report.is_pressed(keycode::LEFT_SHIFT));

    assert!(report.release(keycode::LEFT_CTRL));
    assert_eq!(report.modifier, 0x02);
    assert!(!report.release(keycode::LEFT_CTRL));
}

#[test]
fn keyboard_release_keeps_codes_packed() {
    let mut report = KeyboardReport::empty();
    for code in [0x04, 0x05, 0x06] {
        report.press(code);
    }
    assert!(report.release(0x05));
    assert_eq!(report.keycodes, [0x04, 0x06, 0, 0, 0, 0]);
}

#[test]
fn keyboard_press_is_bounded_to_six_codes() {
    let mut report = KeyboardReport::empty();
    for code in 0x04..0x0A {
        assert!(report.press(code));
    }
    assert!(!report.press(0x0A), "seventh key has no slot");
    assert!(!report.press(0x04), "already held");
    assert!(!report.press(0), "zero is not a key");
}

#[test]
fn keyboard_report_wire_layout() {
    let mut report = KeyboardReport::empty();
    report.press(keycode::LEFT_CTRL);
    report.press(keycode::LEFT_ALT);
    report.press(keycode::A);
    report.press(keycode::C);

    assert_eq!(report.to_bytes(), [0x05, 0x00, 0x04, 0x06, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(HidReport::Keyboard(report).encode().len(), 8);
}

// ═══════════════════════════════════════════════════════════════════════════
// Mouse & Consumer Report Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn mouse_report_motion_is_twos_complement() {
    let report = MouseReport::motion(button::LEFT | button::MIDDLE, -100, 50, -2);
    let bytes = HidReport::Mouse(report).encode();
    assert_eq!(&bytes[..], &[0x05, 0x9C, 0x32, 0xFE]);
}

#[test]
fn consumer_report_is_little_endian() {
    let report = ConsumerReport::new(ConsumerUsage::PlayPause.code());
    assert_eq!(&HidReport::Consumer(report).encode()[..], &[0xCD, 0x00]);
    assert_eq!(ConsumerReport::released().to_bytes(), [0, 0]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Report Actuator Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn held_keys_accumulate_in_reports() {
    let mut act = actuator();
    act.key_down(keycode::LEFT_CTRL);
    act.key_down(keycode::C);
    act.key_up(keycode::C);
    act.key_up(keycode::LEFT_CTRL);

    let sent: Vec<_> = act.output().reports.iter().map(keys).collect();
    assert_eq!(
        sent,
        vec![
            (0x01, [0; 6]),
            (0x01, [keycode::C, 0, 0, 0, 0, 0]),
            (0x01, [0; 6]),
            (0x00, [0; 6]),
        ]
    );
}

#[test]
fn unchanged_state_sends_nothing() {
    let mut act = actuator();
    act.key_up(keycode::A);
    act.consumer_release();
    act.release_all_buttons();
    act.tone_stop();
    act.release_all();

    assert!(act.output().reports.is_empty());
    assert!(act.output().tones.is_empty());
}

#[test]
fn typed_text_presses_then_restores() {
    let mut act = actuator();
    act.key_down(keycode::LEFT_ALT);
    act.type_text("A\u{7f}b");

    let sent: Vec<_> = act.output().reports.iter().map(keys).collect();
    assert_eq!(
        sent,
        vec![
            (0x04, [0; 6]),
            (0x06, [keycode::A, 0, 0, 0, 0, 0]),
            (0x04, [0; 6]),
            (0x04, [0x05, 0, 0, 0, 0, 0]),
            (0x04, [0; 6]),
        ]
    );
    assert!(act.keyboard().is_pressed(keycode::LEFT_ALT));
}

#[test]
fn mouse_buttons_latch_and_motion_does_not() {
    let mut act = actuator();
    act.mouse_button(button::LEFT, true);
    act.mouse_move(5, -5, 1);
    act.mouse_button(button::RIGHT, false);
    act.mouse_button(button::LEFT, false);

    assert_eq!(
        act.output().reports,
        vec![
            HidReport::Mouse(MouseReport::held(button::LEFT)),
            HidReport::Mouse(MouseReport::motion(button::LEFT, 5, -5, 1)),
            HidReport::Mouse(MouseReport::held(0)),
        ]
    );
}

#[test]
fn release_all_clears_every_latched_output() {
    let mut act = actuator();
    act.key_down(keycode::LEFT_SHIFT);
    act.key_down(keycode::Z);
    act.consumer_press(ConsumerUsage::VolumeUp.code());
    act.mouse_button(button::RIGHT, true);
    act.tone_start(440);

    act.release_all();

    assert!(act.keyboard().is_empty());
    assert_eq!(act.consumer(), 0);
    assert_eq!(act.mouse_buttons(), 0);
    assert_eq!(act.tone(), None);

    let tail = &act.output().reports[act.output().reports.len() - 3..];
    assert_eq!(
        tail,
        &[
            HidReport::Keyboard(KeyboardReport::empty()),
            HidReport::Consumer(ConsumerReport::released()),
            HidReport::Mouse(MouseReport::held(0)),
        ]
    );
    assert_eq!(act.output().tones, vec![Some(440), None]);
}

#[test]
fn playback_forwards_to_output() {
    let mut act = actuator();
    act.play_file("chime.wav");
    act.invoke_callback(3);
    assert_eq!(act.output().files, vec![String::from("chime.wav")]);
}
