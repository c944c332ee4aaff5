//! Tap-dance gesture classifier.
//!
//! Turns press/release timing on a tap-dance key into one of four
//! gestures. Only one key is tracked at a time: pressing another key
//! starts a fresh gesture there and the earlier key's gesture is dropped
//! without firing.
//!
//! Resolution happens on release:
//! - held for at least the hold threshold → [`Gesture::Hold`]
//! - otherwise the tap count picks [`Gesture::SingleTap`] (1) or
//!   [`Gesture::DoubleTap`] (2); three or more taps fire nothing.
//!
//! The tap count survives a resolution, so a second press on the same key
//! inside the tap window fires the double tap on its release (after the
//! first release already fired the single tap).

#[cfg(feature = "defmt")]
use defmt::debug;
#[cfg(not(feature = "defmt"))]
use log::debug;

use crate::config::TapDanceConfig;

/// Resolved gesture; the discriminant indexes the key's four action lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    SingleTap = 0,
    DoubleTap = 1,
    Hold = 2,
    TapAndHold = 3,
}

impl Gesture {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Timing state for the key currently mid-gesture.
#[derive(Debug)]
pub struct TapDance {
    config: TapDanceConfig,
    /// Key pressed and not yet resolved.
    tracked: Option<u8>,
    /// Most recent press, kept after resolution for tap counting.
    last_key: Option<u8>,
    last_press_ms: u64,
    taps: u8,
    /// Set by [`TapDance::poll`] once the tracked key passes the hold threshold.
    hold_armed: bool,
}

impl TapDance {
    pub fn new(config: TapDanceConfig) -> Self {
        Self {
            config,
            tracked: None,
            last_key: None,
            last_press_ms: 0,
            taps: 0,
            hold_armed: false,
        }
    }

    /// Key currently mid-gesture.
    pub fn tracked_key(&self) -> Option<u8> {
        self.tracked
    }

    pub fn tap_count(&self) -> u8 {
        self.taps
    }

    pub fn is_hold_armed(&self) -> bool {
        self.hold_armed
    }

    /// Record a press on `key` at `now_ms`.
    pub fn press(&mut self, key: u8, now_ms: u64) {
        if let Some(prev) = self.tracked {
            if prev != key {
                debug!("tap dance: key {} abandoned for key {}", prev, key);
            }
        }

        let elapsed = now_ms.saturating_sub(self.last_press_ms);
        if self.last_key == Some(key) && elapsed <= self.config.tap_window_ms {
            self.taps = self.taps.saturating_add(1);
        } else {
            self.taps = 1;
        }

        self.last_key = Some(key);
        self.last_press_ms = now_ms;
        self.tracked = Some(key);
        self.hold_armed = false;
    }

    /// Arm the hold once the tracked key has been down long enough.
    ///
    /// Called every loop iteration, whether or not an event arrived.
    pub fn poll(&mut self, now_ms: u64) {
        if self.tracked.is_some()
            && !self.hold_armed
            && now_ms.saturating_sub(self.last_press_ms) >= self.config.hold_ms
        {
            self.hold_armed = true;
        }
    }

    /// Record a release of `key` and resolve the gesture, if any.
    pub fn release(&mut self, key: u8, now_ms: u64) -> Option<Gesture> {
        if self.tracked != Some(key) {
            return None;
        }

        let held = now_ms.saturating_sub(self.last_press_ms);
        // A long press always resolves to Hold; nothing separates
        // tap-and-hold from it, so that gesture's list never fires here.
        let gesture = if held >= self.config.hold_ms {
            Some(Gesture::Hold)
        } else {
            match self.taps {
                1 => Some(Gesture::SingleTap),
                2 => Some(Gesture::DoubleTap),
                _ => None,
            }
        };

        self.tracked = None;
        self.hold_armed = false;

        match gesture {
            Some(g) => debug!("tap dance: key {} -> {}", key, g.index()),
            None => debug!("tap dance: key {} tapped {} times, nothing bound", key, self.taps),
        }
        gesture
    }
}

impl Default for TapDance {
    fn default() -> Self {
        Self::new(TapDanceConfig::default())
    }
}
