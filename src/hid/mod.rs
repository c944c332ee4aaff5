//! HID report types and the actuator that drives them.
//!
//! [`ReportActuator`] keeps the current keyboard, mouse and consumer state
//! and pushes a fresh report to its [`HidOutput`] whenever that state
//! changes. The output decides where reports go (USB endpoint, test log).

pub mod consumer;
pub mod keyboard;
pub mod layout;
pub mod mouse;

#[cfg(test)]
mod tests;

#[cfg(feature = "defmt")]
use defmt::{debug, warn};
#[cfg(not(feature = "defmt"))]
use log::{debug, warn};

use heapless::Vec;

use crate::action::Actuator;
use consumer::ConsumerReport;
use keyboard::{keycode, KeyboardReport};
use mouse::MouseReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HidReport {
    Keyboard(KeyboardReport),
    Mouse(MouseReport),
    Consumer(ConsumerReport),
}

/// Largest report on the wire (keyboard).
pub const MAX_REPORT_LEN: usize = KeyboardReport::LEN;

impl HidReport {
    /// Wire bytes for the report's own endpoint.
    pub fn encode(&self) -> Vec<u8, MAX_REPORT_LEN> {
        match self {
            HidReport::Keyboard(r) => packed(&r.to_bytes()),
            HidReport::Mouse(r) => packed(&r.to_bytes()),
            HidReport::Consumer(r) => packed(&r.to_bytes()),
        }
    }
}

fn packed(bytes: &[u8]) -> Vec<u8, MAX_REPORT_LEN> {
    bytes.iter().copied().collect()
}

/// Sink for reports plus the non-HID outputs macros can trigger.
pub trait HidOutput {
    fn send(&mut self, report: HidReport);

    /// Start a tone at `freq` Hz, or silence with `None`.
    fn tone(&mut self, freq: Option<u16>);

    fn play_file(&mut self, path: &str) {
        warn!("audio playback not supported, skipping {}", path);
    }

    fn callback(&mut self, id: u16) {
        debug!("no handler for callback {}", id);
    }
}

/// [`Actuator`] backed by boot-protocol HID reports.
pub struct ReportActuator<O> {
    out: O,
    keyboard: KeyboardReport,
    mouse_buttons: u8,
    consumer: u16,
    tone: Option<u16>,
}

impl<O: HidOutput> ReportActuator<O> {
    pub fn new(out: O) -> Self {
        Self {
            out,
            keyboard: KeyboardReport::empty(),
            mouse_buttons: 0,
            consumer: 0,
            tone: None,
        }
    }

    pub fn keyboard(&self) -> &KeyboardReport {
        &self.keyboard
    }

    pub fn mouse_buttons(&self) -> u8 {
        self.mouse_buttons
    }

    pub fn consumer(&self) -> u16 {
        self.consumer
    }

    pub fn tone(&self) -> Option<u16> {
        self.tone
    }

    pub fn output(&self) -> &O {
        &self.out
    }

    fn send_keyboard(&mut self) {
        self.out.send(HidReport::Keyboard(self.keyboard));
    }

    fn send_buttons(&mut self) {
        self.out
            .send(HidReport::Mouse(MouseReport::held(self.mouse_buttons)));
    }

    fn send_consumer(&mut self) {
        self.out.send(HidReport::Consumer(ConsumerReport::new(self.consumer)));
    }
}

impl<O: HidOutput> Actuator for ReportActuator<O> {
    fn key_down(&mut self, code: u8) {
        if self.keyboard.press(code) {
            self.send_keyboard();
        }
    }

    fn key_up(&mut self, code: u8) {
        if self.keyboard.release(code) {
            self.send_keyboard();
        }
    }

    fn release_all_keys(&mut self) {
        if self.keyboard.clear() {
            self.send_keyboard();
        }
    }

    /// Each character is a press report followed by the held state again,
    /// so keys held by the macro stay down around the typed text.
    fn type_text(&mut self, text: &str) {
        for byte in text.bytes() {
            let Some((code, shifted)) = layout::from_ascii(byte) else {
                debug!("no key for byte {}", byte);
                continue;
            };
            let mut report = self.keyboard;
            if shifted {
                report.press(keycode::LEFT_SHIFT);
            }
            report.press(code);
            self.out.send(HidReport::Keyboard(report));
            self.send_keyboard();
        }
    }

    fn consumer_press(&mut self, code: u16) {
        self.consumer = code;
        self.send_consumer();
    }

    fn consumer_release(&mut self) {
        if self.consumer != 0 {
            self.consumer = 0;
            self.send_consumer();
        }
    }

    fn mouse_button(&mut self, buttons: u8, down: bool) {
        let next = if down {
            self.mouse_buttons | buttons
        } else {
            self.mouse_buttons & !buttons
        };
        if next != self.mouse_buttons {
            self.mouse_buttons = next;
            self.send_buttons();
        }
    }

    fn release_all_buttons(&mut self) {
        if self.mouse_buttons != 0 {
            self.mouse_buttons = 0;
            self.send_buttons();
        }
    }

    fn mouse_move(&mut self, dx: i8, dy: i8, wheel: i8) {
        self.out
            .send(HidReport::Mouse(MouseReport::motion(self.mouse_buttons, dx, dy, wheel)));
    }

    fn tone_start(&mut self, freq: u16) {
        self.tone = Some(freq);
        self.out.tone(Some(freq));
    }

    fn tone_stop(&mut self) {
        if self.tone.take().is_some() {
            self.out.tone(None);
        }
    }

    fn play_file(&mut self, path: &str) {
        self.out.play_file(path);
    }

    fn invoke_callback(&mut self, id: u16) {
        self.out.callback(id);
    }
}
