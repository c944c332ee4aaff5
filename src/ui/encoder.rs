//! Quadrature decoding for the rotary encoder.
//!
//! The A/B pins are sampled every tick; valid Gray-code transitions move a
//! quarter-step counter. The reported position only changes when the pins
//! come back to the detent rest state, taken from the levels sampled at
//! construction (both high with pull-ups, both low with pull-downs), so
//! contact bounce around a detent never shows up. Invalid jumps (both pins
//! changed) are ignored.

/// Quarter steps per detent on the usual mechanical encoders.
const STEPS_PER_DETENT: i32 = 4;

#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    rest: u8,
    state: u8,
    quarters: i32,
    position: i32,
}

impl QuadratureDecoder {
    /// Start from the current pin levels, which must be a detent.
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            rest: pins(a, b),
            state: pins(a, b),
            quarters: 0,
            position: 0,
        }
    }

    /// Feed a sample of both pins.
    pub fn update(&mut self, a: bool, b: bool) {
        let next = pins(a, b);
        // Gray-code order 00 -> 01 -> 11 -> 10 -> 00 is clockwise.
        let step = match (self.state, next) {
            (0b00, 0b01) | (0b01, 0b11) | (0b11, 0b10) | (0b10, 0b00) => 1,
            (0b00, 0b10) | (0b10, 0b11) | (0b11, 0b01) | (0b01, 0b00) => -1,
            _ => 0,
        };
        self.quarters = self.quarters.wrapping_add(step);
        self.state = next;
        if next == self.rest {
            self.position = self.quarters.div_euclid(STEPS_PER_DETENT);
        }
    }

    /// Absolute position in detents.
    pub fn position(&self) -> i32 {
        self.position
    }
}

fn pins(a: bool, b: bool) -> u8 {
    (u8::from(a) << 1) | u8::from(b)
}
