//! Debouncing for active-low switches (keys and the encoder push switch).
//!
//! Sampled from the polling loop rather than edge interrupts: a new level
//! is accepted only after it has been stable for the debounce time.

use crate::config::BUTTON_DEBOUNCE_MS;

/// Debounced level of one switch.
#[derive(Debug, Clone)]
pub struct Debouncer {
    stable: bool,
    candidate: bool,
    since_ms: u64,
    debounce_ms: u64,
}

impl Debouncer {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            stable: false,
            candidate: false,
            since_ms: 0,
            debounce_ms,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Feed a raw sample (`true` = pressed). Returns the new level when the
    /// debounced state changes.
    pub fn update(&mut self, pressed: bool, now_ms: u64) -> Option<bool> {
        if pressed != self.candidate {
            self.candidate = pressed;
            self.since_ms = now_ms;
        }
        if self.candidate != self.stable
            && now_ms.saturating_sub(self.since_ms) >= self.debounce_ms
        {
            self.stable = self.candidate;
            return Some(self.stable);
        }
        None
    }

    /// Like [`update`](Self::update) but only reports presses.
    pub fn pressed_edge(&mut self, pressed: bool, now_ms: u64) -> bool {
        self.update(pressed, now_ms) == Some(true)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(BUTTON_DEBOUNCE_MS)
    }
}
