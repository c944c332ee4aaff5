//! Definitions shipped with the firmware.
//!
//! Laid out like a definition tree on disk so they go through the same
//! loader as user definitions: a favorites app, media and numpad apps at
//! the top level, and an `arc` folder of browser apps.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use super::{AppDefinition, CatalogSource, KeySlot};
use crate::action::{ActionSpec, Op};
use crate::error::Error;
use crate::hid::consumer::ConsumerUsage;
use crate::hid::keyboard::keycode;
use crate::hid::mouse::button;

/// Root the built-in paths live under.
pub const ROOT: &str = "/macros";

type Builder = fn() -> AppDefinition;

const FILES: &[(&str, Builder)] = &[
    ("/macros/favorites.app", favorites),
    ("/macros/media.app", media),
    ("/macros/numpad.app", numpad),
    ("/macros/arc/nav.app", arc_nav),
    ("/macros/arc/tabs.app", arc_tabs),
];

/// [`CatalogSource`] over the built-in definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSource;

impl CatalogSource for StaticSource {
    fn paths(&self) -> Vec<String> {
        FILES.iter().map(|(path, _)| String::from(*path)).collect()
    }

    fn read(&self, path: &str) -> Result<AppDefinition, Error> {
        FILES
            .iter()
            .find(|(p, _)| *p == path)
            .map(|(_, build)| build())
            .ok_or(Error::Decode)
    }
}

fn simple(ops: Vec<Op>) -> ActionSpec {
    ActionSpec::Simple(ops)
}

fn key(color: u32, label: &str, ops: Vec<Op>) -> KeySlot {
    KeySlot::new(color, label, simple(ops))
}

fn chord(modifier: u8, code: u8) -> Vec<Op> {
    vec![Op::KeyDown(modifier), Op::KeyDown(code)]
}

fn media_key(color: u32, label: &str, usage: ConsumerUsage) -> KeySlot {
    key(color, label, vec![Op::MediaKeyPress(usage.code())])
}

fn favorites() -> AppDefinition {
    let fav = |n: u8| {
        let label = alloc::format!("Fav{}", n);
        let command = alloc::format!("FAVORITE_{}", n);
        key(0x004000, &label, vec![Op::SymbolicCommand(command)])
    };
    let mut keys: Vec<KeySlot> = (1..=9).map(fav).collect();
    keys.push(key(0x400000, "Set", vec![Op::command("SET_FAVORITE")]));
    keys.push(fav(10));
    keys.push(key(0x404000, "Back", vec![Op::command("BACK_TO_MAIN")]));
    // Encoder binding; the pad has no key for it.
    keys.push(key(0x000000, "", vec![Op::KeyDown(keycode::BACKSPACE)]));
    AppDefinition {
        name: String::from("Favorites"),
        keys,
    }
}

fn media() -> AppDefinition {
    let play_or_skip = ActionSpec::TapDance([
        vec![Op::MediaKeyPress(ConsumerUsage::PlayPause.code())],
        vec![Op::MediaKeyPress(ConsumerUsage::NextTrack.code())],
        vec![Op::MediaKeyPress(ConsumerUsage::Stop.code())],
        vec![],
    ]);
    AppDefinition {
        name: String::from("Media"),
        keys: vec![
            media_key(0x000020, "Vol-", ConsumerUsage::VolumeDown),
            media_key(0x200000, "Mute", ConsumerUsage::Mute),
            media_key(0x000020, "Vol+", ConsumerUsage::VolumeUp),
            media_key(0x202000, "Prev", ConsumerUsage::PrevTrack),
            KeySlot::new(0x002000, "Play", play_or_skip),
            media_key(0x202000, "Next", ConsumerUsage::NextTrack),
            key(
                0x100010,
                "Beep",
                vec![Op::ToneStart(880), Op::Delay(100), Op::ToneStop],
            ),
            key(0x100010, "Chime", vec![Op::PlayFile(String::from("chime.wav"))]),
            key(
                0x101010,
                "Click",
                vec![Op::mouse(i16::from(button::LEFT)), Op::mouse(-i16::from(button::LEFT))],
            ),
            media_key(0x001020, "Rew", ConsumerUsage::Rewind),
            media_key(0x202020, "Bright", ConsumerUsage::BrightnessUp),
            media_key(0x001020, "FF", ConsumerUsage::FastForward),
        ],
    }
}

fn numpad() -> AppDefinition {
    let digit = |d: u8| {
        let code = if d == 0 { keycode::N0 } else { keycode::N1 + d - 1 };
        let label = alloc::format!("{}", d);
        key(0x202020, &label, vec![Op::KeyDown(code)])
    };
    let mut keys: Vec<KeySlot> = [7, 8, 9, 4, 5, 6, 1, 2, 3].into_iter().map(digit).collect();
    keys.push(key(0x200000, "Del", vec![Op::KeyDown(keycode::BACKSPACE)]));
    keys.push(digit(0));
    keys.push(key(0x002000, "Enter", vec![Op::KeyDown(keycode::ENTER)]));
    AppDefinition {
        name: String::from("Numpad"),
        keys,
    }
}

fn arc_nav() -> AppDefinition {
    // Tap: copy, double tap: cut, hold: paste.
    let clipboard = ActionSpec::TapDance([
        chord(keycode::LEFT_GUI, keycode::C),
        chord(keycode::LEFT_GUI, keycode::X),
        chord(keycode::LEFT_GUI, keycode::V),
        vec![],
    ]);
    AppDefinition {
        name: String::from("Nav"),
        keys: vec![
            key(0x333333, "PgUp", vec![Op::KeyDown(keycode::PAGE_UP)]),
            key(0x333333, "Up", vec![Op::KeyDown(keycode::UP)]),
            key(0x333333, "PgDn", vec![Op::KeyDown(keycode::PAGE_DOWN)]),
            key(0x333333, "Left", vec![Op::KeyDown(keycode::LEFT)]),
            key(0x333333, "Down", vec![Op::KeyDown(keycode::DOWN)]),
            key(0x333333, "Right", vec![Op::KeyDown(keycode::RIGHT)]),
            key(0x003333, "Home", vec![Op::KeyDown(keycode::HOME)]),
            KeySlot::new(0x330033, "Clip", clipboard),
            key(0x003333, "End", vec![Op::KeyDown(keycode::END)]),
            key(0x330000, "Close", chord(keycode::LEFT_GUI, keycode::W)),
            key(0x003300, "New", chord(keycode::LEFT_GUI, keycode::T)),
            key(
                0x000033,
                "Scroll",
                vec![Op::MouseMove { dx: 0, dy: 0, wheel: -5 }],
            ),
        ],
    }
}

fn arc_tabs() -> AppDefinition {
    const COLORS: [u32; 9] = [
        0xFF5733, 0x33FF57, 0x5733FF, 0xFFFF33, 0x33FFFF, 0xFF33FF, 0xFF3333, 0x33FF33, 0x3333FF,
    ];
    let mut keys: Vec<KeySlot> = COLORS
        .iter()
        .zip(0u8..)
        .map(|(&color, i)| {
            let label = alloc::format!("Tab {}", i + 1);
            key(color, &label, chord(keycode::LEFT_GUI, keycode::N1 + i))
        })
        .collect();
    keys.push(key(
        0xAAFF33,
        "Back",
        vec![Op::KeyDown(keycode::LEFT_GUI), Op::text("[")],
    ));
    keys.push(key(
        0xFFA500,
        "Search",
        vec![
            Op::KeyDown(keycode::LEFT_GUI),
            Op::KeyDown(keycode::F),
            Op::KeyUp(keycode::F),
            Op::KeyUp(keycode::LEFT_GUI),
            Op::Delay(150),
            Op::text("hotkeys\n"),
        ],
    ));
    keys.push(key(
        0xAAFF33,
        "Fwd",
        vec![Op::KeyDown(keycode::LEFT_GUI), Op::text("]")],
    ));
    AppDefinition {
        name: String::from("Tabs"),
        keys,
    }
}
