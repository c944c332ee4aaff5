//! Macro actions bound to keys.
//!
//! An action list is an ordered sequence of [`Op`]s. Each key carries an
//! [`ActionSpec`]: either one list run on press/release, or four tap-dance
//! lists selected by tap count and hold duration.

mod executor;

pub use executor::{execute, Actuator, Phase};

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::tap_dance::Gesture;

/// Primitive step of a macro.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    /// Press a keyboard usage code; released again in the release phase.
    KeyDown(u8),
    /// Release a keyboard usage code immediately, in either phase.
    KeyUp(u8),
    /// Block the control loop (ms).
    Delay(u32),
    /// Type a string through the keyboard layout.
    TypeText(String),
    /// Press a consumer-control usage, replacing any active one.
    MediaKeyPress(u16),
    /// Press mouse buttons (bitfield); released again in the release phase.
    MouseDown(u8),
    /// Release mouse buttons immediately.
    MouseUp(u8),
    MouseMove { dx: i8, dy: i8, wheel: i8 },
    /// Start a tone (Hz). Zero behaves like [`Op::ToneStop`].
    ToneStart(u16),
    ToneStop,
    PlayFile(String),
    /// Named command interpreted by the dispatcher, e.g. `SET_FAVORITE`.
    SymbolicCommand(String),
    /// Board-defined callback.
    InvokeCallback(u16),
    /// Step from a newer definition format; skipped.
    Unknown,
}

impl Op {
    /// Keyboard step from a signed code: positive presses, negative releases.
    pub fn key(code: i16) -> Self {
        match u8::try_from(code.unsigned_abs()) {
            Ok(c) if code >= 0 => Op::KeyDown(c),
            Ok(c) => Op::KeyUp(c),
            Err(_) => Op::Unknown,
        }
    }

    /// Mouse button step from a signed bitfield: positive presses, negative releases.
    pub fn mouse(buttons: i16) -> Self {
        match u8::try_from(buttons.unsigned_abs()) {
            Ok(b) if buttons >= 0 => Op::MouseDown(b),
            Ok(b) => Op::MouseUp(b),
            Err(_) => Op::Unknown,
        }
    }

    pub fn command(name: &str) -> Self {
        Op::SymbolicCommand(String::from(name))
    }

    pub fn text(text: &str) -> Self {
        Op::TypeText(String::from(text))
    }
}

/// Ordered list of steps.
pub type ActionList = Vec<Op>;

/// What a key does.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSpec {
    /// Run on press, undo latched effects on release.
    Simple(ActionList),
    /// Indexed by single-tap, double-tap, hold, tap-and-hold.
    TapDance([ActionList; 4]),
}

impl ActionSpec {
    /// First symbolic command of a simple list, if it starts with one.
    pub fn leading_command(&self) -> Option<&str> {
        match self {
            ActionSpec::Simple(ops) => match ops.first() {
                Some(Op::SymbolicCommand(name)) => Some(name.as_str()),
                _ => None,
            },
            ActionSpec::TapDance(_) => None,
        }
    }

    /// Action list a resolved gesture selects. Simple keys have none.
    pub fn for_gesture(&self, gesture: Gesture) -> Option<&[Op]> {
        match self {
            ActionSpec::TapDance(lists) => Some(lists[gesture.index()].as_slice()),
            ActionSpec::Simple(_) => None,
        }
    }
}

impl Default for ActionSpec {
    fn default() -> Self {
        ActionSpec::Simple(Vec::new())
    }
}
