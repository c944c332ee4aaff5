//! Keyboard report and the usage codes built-in macros refer to.
//!
//! Macros address modifiers by usage code (0xE0-0xE7) like any other key;
//! [`KeyboardReport`] folds those into the modifier byte and keeps up to
//! six other codes, packed at the front in press order. On the wire:
//! `[modifier, 0, code0..code5]`.

/// Keyboard/keypad usage codes (usage page 0x07).
pub mod keycode {
    pub const A: u8 = 0x04;
    pub const C: u8 = 0x06;
    pub const F: u8 = 0x09;
    pub const S: u8 = 0x16;
    pub const T: u8 = 0x17;
    pub const V: u8 = 0x19;
    pub const W: u8 = 0x1A;
    pub const X: u8 = 0x1B;
    pub const Y: u8 = 0x1C;
    pub const Z: u8 = 0x1D;
    /// `1`; digits 1-9 follow consecutively, then `0` at 0x27.
    pub const N1: u8 = 0x1E;
    pub const N0: u8 = 0x27;
    pub const ENTER: u8 = 0x28;
    pub const ESCAPE: u8 = 0x29;
    pub const BACKSPACE: u8 = 0x2A;
    pub const TAB: u8 = 0x2B;
    pub const SPACE: u8 = 0x2C;
    pub const HOME: u8 = 0x4A;
    pub const PAGE_UP: u8 = 0x4B;
    pub const DELETE: u8 = 0x4C;
    pub const END: u8 = 0x4D;
    pub const PAGE_DOWN: u8 = 0x4E;
    pub const RIGHT: u8 = 0x4F;
    pub const LEFT: u8 = 0x50;
    pub const DOWN: u8 = 0x51;
    pub const UP: u8 = 0x52;
    pub const LEFT_CTRL: u8 = 0xE0;
    pub const LEFT_SHIFT: u8 = 0xE1;
    pub const LEFT_ALT: u8 = 0xE2;
    pub const LEFT_GUI: u8 = 0xE3;
    pub const RIGHT_GUI: u8 = 0xE7;
}

/// Number of non-modifier keys a report can carry.
const ROLLOVER: usize = 6;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: u8,
    pub keycodes: [u8; ROLLOVER],
}

impl KeyboardReport {
    pub const LEN: usize = 2 + ROLLOVER;

    pub const fn empty() -> Self {
        Self {
            modifier: 0,
            keycodes: [0; ROLLOVER],
        }
    }

    /// Hold `code`. Returns whether the report changed; a seventh key
    /// is dropped.
    pub fn press(&mut self, code: u8) -> bool {
        if let Some(bit) = modifier_bit(code) {
            return self.set_modifier(self.modifier | bit);
        }
        if code == 0 || self.keycodes.contains(&code) {
            return false;
        }
        let held = self.held_count();
        if held == ROLLOVER {
            return false;
        }
        self.keycodes[held] = code;
        true
    }

    /// Let go of `code`. Returns whether it was held.
    pub fn release(&mut self, code: u8) -> bool {
        if let Some(bit) = modifier_bit(code) {
            return self.set_modifier(self.modifier & !bit);
        }
        if code == 0 {
            return false;
        }
        let Some(at) = self.keycodes.iter().position(|&k| k == code) else {
            return false;
        };
        self.keycodes[at..].rotate_left(1);
        self.keycodes[ROLLOVER - 1] = 0;
        true
    }

    /// Release everything. Returns whether anything was held.
    pub fn clear(&mut self) -> bool {
        let held = !self.is_empty();
        *self = Self::empty();
        held
    }

    pub fn is_pressed(&self, code: u8) -> bool {
        match modifier_bit(code) {
            Some(bit) => self.modifier & bit != 0,
            None => code != 0 && self.keycodes.contains(&code),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.held_count() == 0
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut bytes = [0; Self::LEN];
        bytes[0] = self.modifier;
        bytes[2..].copy_from_slice(&self.keycodes);
        bytes
    }

    fn held_count(&self) -> usize {
        self.keycodes.iter().take_while(|&&k| k != 0).count()
    }

    fn set_modifier(&mut self, modifier: u8) -> bool {
        let changed = modifier != self.modifier;
        self.modifier = modifier;
        changed
    }
}

fn modifier_bit(code: u8) -> Option<u8> {
    match code {
        keycode::LEFT_CTRL..=keycode::RIGHT_GUI => Some(1 << (code - keycode::LEFT_CTRL)),
        _ => None,
    }
}

/// Boot keyboard: modifier bits, a reserved byte, five LED outputs and six
/// array keys.
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, 0x09, 0x06, // Generic Desktop / Keyboard
    0xA1, 0x01, //             Application
    // modifiers: usages 0xE0-0xE7 as bits
    0x05, 0x07, 0x19, 0xE0, 0x29, 0xE7, 0x15, 0x00, 0x25, 0x01, //
    0x75, 0x01, 0x95, 0x08, 0x81, 0x02, //
    // reserved
    0x95, 0x01, 0x75, 0x08, 0x81, 0x01, //
    // LEDs: Num Lock to Kana, padded to a byte
    0x05, 0x08, 0x19, 0x01, 0x29, 0x05, 0x95, 0x05, 0x75, 0x01, 0x91, 0x02, //
    0x95, 0x01, 0x75, 0x03, 0x91, 0x01, //
    // six key slots
    0x05, 0x07, 0x19, 0x00, 0x29, 0xFF, 0x15, 0x00, 0x26, 0xFF, 0x00, //
    0x95, 0x06, 0x75, 0x08, 0x81, 0x00, //
    0xC0,
];
