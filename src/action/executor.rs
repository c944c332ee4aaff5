//! Runs action lists against the HID actuator.
//!
//! Press and release are symmetric: the press phase performs every step in
//! order, the release phase only undoes what would otherwise stay latched
//! (held keys, held mouse buttons, a sounding tone, the consumer code).

use embedded_hal::delay::DelayNs;

#[cfg(feature = "defmt")]
use defmt::debug;
#[cfg(not(feature = "defmt"))]
use log::debug;

use super::Op;

/// Which edge of the key an action list runs for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Press,
    Release,
}

/// Output capabilities macros drive.
pub trait Actuator {
    fn key_down(&mut self, code: u8);
    fn key_up(&mut self, code: u8);
    fn release_all_keys(&mut self);
    fn type_text(&mut self, text: &str);
    fn consumer_press(&mut self, code: u16);
    /// Idempotent when nothing is pressed.
    fn consumer_release(&mut self);
    fn mouse_button(&mut self, buttons: u8, down: bool);
    fn release_all_buttons(&mut self);
    fn mouse_move(&mut self, dx: i8, dy: i8, wheel: i8);
    fn tone_start(&mut self, freq: u16);
    fn tone_stop(&mut self);
    fn play_file(&mut self, path: &str);
    fn invoke_callback(&mut self, id: u16);

    /// Drop every latched output: keys, consumer code, mouse buttons, tone.
    fn release_all(&mut self) {
        self.release_all_keys();
        self.consumer_release();
        self.release_all_buttons();
        self.tone_stop();
    }
}

impl<T: Actuator + ?Sized> Actuator for &mut T {
    fn key_down(&mut self, code: u8) {
        (**self).key_down(code)
    }
    fn key_up(&mut self, code: u8) {
        (**self).key_up(code)
    }
    fn release_all_keys(&mut self) {
        (**self).release_all_keys()
    }
    fn type_text(&mut self, text: &str) {
        (**self).type_text(text)
    }
    fn consumer_press(&mut self, code: u16) {
        (**self).consumer_press(code)
    }
    fn consumer_release(&mut self) {
        (**self).consumer_release()
    }
    fn mouse_button(&mut self, buttons: u8, down: bool) {
        (**self).mouse_button(buttons, down)
    }
    fn release_all_buttons(&mut self) {
        (**self).release_all_buttons()
    }
    fn mouse_move(&mut self, dx: i8, dy: i8, wheel: i8) {
        (**self).mouse_move(dx, dy, wheel)
    }
    fn tone_start(&mut self, freq: u16) {
        (**self).tone_start(freq)
    }
    fn tone_stop(&mut self) {
        (**self).tone_stop()
    }
    fn play_file(&mut self, path: &str) {
        (**self).play_file(path)
    }
    fn invoke_callback(&mut self, id: u16) {
        (**self).invoke_callback(id)
    }
    fn release_all(&mut self) {
        (**self).release_all()
    }
}

/// Execute `ops` for the given phase. Delays block the caller.
pub fn execute<A, D>(ops: &[Op], phase: Phase, actuator: &mut A, delay: &mut D)
where
    A: Actuator + ?Sized,
    D: DelayNs + ?Sized,
{
    match phase {
        Phase::Press => press(ops, actuator, delay),
        Phase::Release => release(ops, actuator),
    }
}

fn press<A, D>(ops: &[Op], actuator: &mut A, delay: &mut D)
where
    A: Actuator + ?Sized,
    D: DelayNs + ?Sized,
{
    for op in ops {
        match op {
            Op::KeyDown(code) => actuator.key_down(*code),
            Op::KeyUp(code) => actuator.key_up(*code),
            Op::Delay(ms) => delay.delay_ms(*ms),
            Op::TypeText(text) => actuator.type_text(text),
            Op::MediaKeyPress(code) => {
                actuator.consumer_release();
                actuator.consumer_press(*code);
            }
            Op::MouseDown(buttons) => actuator.mouse_button(*buttons, true),
            Op::MouseUp(buttons) => actuator.mouse_button(*buttons, false),
            Op::MouseMove { dx, dy, wheel } => actuator.mouse_move(*dx, *dy, *wheel),
            Op::ToneStart(0) | Op::ToneStop => actuator.tone_stop(),
            Op::ToneStart(freq) => {
                actuator.tone_stop();
                actuator.tone_start(*freq);
            }
            Op::PlayFile(path) => actuator.play_file(path),
            Op::InvokeCallback(id) => actuator.invoke_callback(*id),
            Op::SymbolicCommand(name) => debug!("command {} outside favorites ignored", name.as_str()),
            Op::Unknown => {}
        }
    }
}

fn release<A>(ops: &[Op], actuator: &mut A)
where
    A: Actuator + ?Sized,
{
    for op in ops {
        match op {
            Op::KeyDown(code) => actuator.key_up(*code),
            Op::MouseDown(buttons) => actuator.mouse_button(*buttons, false),
            Op::ToneStart(_) | Op::ToneStop => actuator.tone_stop(),
            _ => {}
        }
    }
    actuator.consumer_release();
}
