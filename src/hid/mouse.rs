//! Mouse report: button bits plus one relative motion step.
//!
//! Wire layout is `[buttons, x, y, wheel]`, the three motion bytes being
//! two's-complement deltas. Macros only ever latch buttons; motion is sent
//! once and never carried into the next report.

/// Button bits as macros name them (`Op::mouse(LEFT)` presses, `-LEFT`
/// releases).
pub mod button {
    pub const LEFT: u8 = 1 << 0;
    pub const RIGHT: u8 = 1 << 1;
    pub const MIDDLE: u8 = 1 << 2;
}

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseReport {
    pub buttons: u8,
    pub x: i8,
    pub y: i8,
    pub wheel: i8,
}

impl MouseReport {
    pub const LEN: usize = 4;

    /// Buttons held, no motion.
    pub const fn held(buttons: u8) -> Self {
        Self::motion(buttons, 0, 0, 0)
    }

    pub const fn motion(buttons: u8, x: i8, y: i8, wheel: i8) -> Self {
        Self { buttons, x, y, wheel }
    }

    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        [
            self.buttons,
            self.x.to_le_bytes()[0],
            self.y.to_le_bytes()[0],
            self.wheel.to_le_bytes()[0],
        ]
    }
}

/// Three buttons, X/Y and a wheel, all relative.
pub const MOUSE_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, 0x09, 0x02, // Generic Desktop / Mouse
    0xA1, 0x01, 0x09, 0x01, // Application / Pointer
    0xA1, 0x00, //             Physical
    // buttons 1-3 as single bits, then 5 bits of padding
    0x05, 0x09, 0x19, 0x01, 0x29, 0x03, 0x15, 0x00, 0x25, 0x01, //
    0x95, 0x03, 0x75, 0x01, 0x81, 0x02, //
    0x95, 0x01, 0x75, 0x05, 0x81, 0x01, //
    // X, Y, wheel: one signed byte each
    0x05, 0x01, 0x09, 0x30, 0x09, 0x31, 0x09, 0x38, //
    0x15, 0x81, 0x25, 0x7F, 0x75, 0x08, 0x95, 0x03, //
    0x81, 0x06, //
    0xC0, 0xC0,
];
