//! User interface subsystem - key LEDs, OLED, encoder and keys.
//!
//! The dispatcher talks to hardware only through the traits here, so the
//! whole control core runs unchanged on the host under test.
//!
//! ## Components
//!
//! - **Display**: title bar + 3x4 key label grid or app menu, and one
//!   RGB pixel per key
//! - **Buttons**: time-based debouncing for keys and the encoder switch
//! - **Encoder**: quadrature decoding into an absolute position

pub mod buttons;
pub mod display;
pub mod encoder;
pub mod input_logic;

use embedded_hal::delay::DelayNs;

/// A debounced key transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub key: u8,
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn press(key: u8) -> Self {
        Self { key, pressed: true }
    }

    pub const fn release(key: u8) -> Self {
        Self { key, pressed: false }
    }
}

/// Polled inputs, sampled once per loop tick.
pub trait Controls {
    /// Absolute encoder position (detents since boot).
    fn encoder_position(&mut self) -> i32;

    /// True once per press of the encoder switch.
    fn encoder_pressed(&mut self) -> bool;

    /// Oldest pending key transition.
    fn next_key_event(&mut self) -> Option<KeyEvent>;
}

/// Monotonic time plus blocking delay.
pub trait Clock: DelayNs {
    fn now_ms(&self) -> u64;
}

/// One visible menu row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuRow<'a> {
    pub text: &'a str,
    /// Rows standing for a folder are shown bracketed.
    pub group: bool,
}

/// Display and key LEDs. Nothing is guaranteed visible before [`commit`].
///
/// [`commit`]: DisplaySink::commit
pub trait DisplaySink {
    fn set_key_color(&mut self, index: usize, rgb: u32);
    fn set_key_label(&mut self, index: usize, text: &str);
    fn set_title(&mut self, text: &str);

    /// Replace the key grid with a list; `highlight` indexes into `rows`.
    fn render_list(&mut self, rows: &[MenuRow<'_>], highlight: usize, inverse: bool);

    fn commit(&mut self);
}

impl<T: Controls + ?Sized> Controls for &mut T {
    fn encoder_position(&mut self) -> i32 {
        (**self).encoder_position()
    }

    fn encoder_pressed(&mut self) -> bool {
        (**self).encoder_pressed()
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        (**self).next_key_event()
    }
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

impl<T: DisplaySink + ?Sized> DisplaySink for &mut T {
    fn set_key_color(&mut self, index: usize, rgb: u32) {
        (**self).set_key_color(index, rgb)
    }

    fn set_key_label(&mut self, index: usize, text: &str) {
        (**self).set_key_label(index, text)
    }

    fn set_title(&mut self, text: &str) {
        (**self).set_title(text)
    }

    fn render_list(&mut self, rows: &[MenuRow<'_>], highlight: usize, inverse: bool) {
        (**self).render_list(rows, highlight, inverse)
    }

    fn commit(&mut self) {
        (**self).commit()
    }
}
