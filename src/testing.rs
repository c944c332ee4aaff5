//! Host-side fakes shared by the unit tests.

use alloc::collections::VecDeque;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;
use core::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;

use crate::action::{ActionSpec, Actuator, Op};
use crate::catalog::{AppDefinition, AppId, Application, CatalogEntry, KeySlot};
use crate::config::KEY_COUNT;
use crate::ui::display::{PixelStrip, Surface};
use crate::ui::{Clock, Controls, DisplaySink, KeyEvent, MenuRow};

#[ctor::ctor]
fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ═══════════════════════════════════════════════════════════════════════════
// Catalog builders
// ═══════════════════════════════════════════════════════════════════════════

/// Three-key definition whose key `i` presses usage `0x04 + i`.
pub fn definition(name: &str) -> AppDefinition {
    AppDefinition {
        name: name.into(),
        keys: (0..3u8)
            .map(|i| {
                KeySlot::new(
                    0x000010 * (u32::from(i) + 1),
                    &format!("{}{}", name, i),
                    ActionSpec::Simple(alloc::vec![Op::KeyDown(0x04 + i)]),
                )
            })
            .collect(),
    }
}

pub fn app(name: &str) -> CatalogEntry {
    let id = AppId {
        folder: "/macros".into(),
        filename: format!("{}.app", name.to_lowercase()),
    };
    CatalogEntry::Leaf(Application::new(id, definition(name)))
}

pub fn group(name: &str, entries: Vec<CatalogEntry>) -> CatalogEntry {
    CatalogEntry::Group {
        name: name.into(),
        entries,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Actuator
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    KeyDown(u8),
    KeyUp(u8),
    ReleaseAllKeys,
    TypeText(String),
    ConsumerPress(u16),
    ConsumerRelease,
    MouseButton(u8, bool),
    ReleaseAllButtons,
    MouseMove(i8, i8, i8),
    ToneStart(u16),
    ToneStop,
    PlayFile(String),
    Callback(u16),
}

#[derive(Default)]
pub struct RecordingActuator {
    pub calls: Vec<Call>,
}

impl Actuator for RecordingActuator {
    fn key_down(&mut self, code: u8) {
        self.calls.push(Call::KeyDown(code));
    }
    fn key_up(&mut self, code: u8) {
        self.calls.push(Call::KeyUp(code));
    }
    fn release_all_keys(&mut self) {
        self.calls.push(Call::ReleaseAllKeys);
    }
    fn type_text(&mut self, text: &str) {
        self.calls.push(Call::TypeText(text.into()));
    }
    fn consumer_press(&mut self, code: u16) {
        self.calls.push(Call::ConsumerPress(code));
    }
    fn consumer_release(&mut self) {
        self.calls.push(Call::ConsumerRelease);
    }
    fn mouse_button(&mut self, buttons: u8, down: bool) {
        self.calls.push(Call::MouseButton(buttons, down));
    }
    fn release_all_buttons(&mut self) {
        self.calls.push(Call::ReleaseAllButtons);
    }
    fn mouse_move(&mut self, dx: i8, dy: i8, wheel: i8) {
        self.calls.push(Call::MouseMove(dx, dy, wheel));
    }
    fn tone_start(&mut self, freq: u16) {
        self.calls.push(Call::ToneStart(freq));
    }
    fn tone_stop(&mut self) {
        self.calls.push(Call::ToneStop);
    }
    fn play_file(&mut self, path: &str) {
        self.calls.push(Call::PlayFile(path.into()));
    }
    fn invoke_callback(&mut self, id: u16) {
        self.calls.push(Call::Callback(id));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Time
// ═══════════════════════════════════════════════════════════════════════════

/// Clock advanced only by delays.
#[derive(Default)]
pub struct FakeClock {
    pub now: u64,
    sub_ms_ns: u64,
}

impl DelayNs for FakeClock {
    fn delay_ns(&mut self, ns: u32) {
        self.sub_ms_ns += u64::from(ns);
        self.now += self.sub_ms_ns / 1_000_000;
        self.sub_ms_ns %= 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.now += u64::from(ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now
    }
}

/// Clock whose time is also visible to [`ScriptedControls`].
#[derive(Clone, Default)]
pub struct SharedClock(Rc<Cell<u64>>);

impl SharedClock {
    pub fn now(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl DelayNs for SharedClock {
    fn delay_ns(&mut self, ns: u32) {
        self.advance(u64::from(ns.div_ceil(1_000_000)));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.advance(u64::from(ms));
    }
}

impl Clock for SharedClock {
    fn now_ms(&self) -> u64 {
        self.now()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Controls
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug)]
pub enum Input {
    /// Turn the encoder by this many detents.
    Turn(i32),
    /// Click the encoder switch.
    Click,
    Key(KeyEvent),
}

/// Inputs that become visible once the shared clock reaches their time.
pub struct ScriptedControls {
    clock: SharedClock,
    script: VecDeque<(u64, Input)>,
    position: i32,
    clicked: bool,
    keys: VecDeque<KeyEvent>,
}

impl ScriptedControls {
    pub fn new(clock: &SharedClock) -> Self {
        Self {
            clock: clock.clone(),
            script: VecDeque::new(),
            position: 0,
            clicked: false,
            keys: VecDeque::new(),
        }
    }

    /// Schedule `input` at `at_ms`. Entries must be added in time order.
    pub fn at(mut self, at_ms: u64, input: Input) -> Self {
        self.script.push_back((at_ms, input));
        self
    }

    pub fn is_drained(&self) -> bool {
        self.script.is_empty() && self.keys.is_empty() && !self.clicked
    }

    fn pump(&mut self) {
        let now = self.clock.now();
        while self.script.front().is_some_and(|(t, _)| *t <= now) {
            if let Some((_, input)) = self.script.pop_front() {
                match input {
                    Input::Turn(d) => self.position += d,
                    Input::Click => self.clicked = true,
                    Input::Key(e) => self.keys.push_back(e),
                }
            }
        }
    }
}

impl Controls for ScriptedControls {
    fn encoder_position(&mut self) -> i32 {
        self.pump();
        self.position
    }

    fn encoder_pressed(&mut self) -> bool {
        self.pump();
        core::mem::take(&mut self.clicked)
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.pump();
        self.keys.pop_front()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Display
// ═══════════════════════════════════════════════════════════════════════════

pub type ListFrame = (Vec<String>, usize, bool);

/// Display model that records what the core asked for.
#[derive(Default)]
pub struct FakeDisplay {
    pub colors: [u32; KEY_COUNT],
    pub labels: [String; KEY_COUNT],
    pub title: String,
    /// Every title ever set, in order.
    pub titles: Vec<String>,
    /// Current menu, `None` while the key grid is shown.
    pub list: Option<ListFrame>,
    /// Menu frames as committed.
    pub committed_lists: Vec<ListFrame>,
    pub commits: usize,
}

impl DisplaySink for FakeDisplay {
    fn set_key_color(&mut self, index: usize, rgb: u32) {
        self.colors[index] = rgb;
    }

    fn set_key_label(&mut self, index: usize, text: &str) {
        self.labels[index] = text.into();
        self.list = None;
    }

    fn set_title(&mut self, text: &str) {
        self.title = text.into();
        self.titles.push(text.into());
    }

    fn render_list(&mut self, rows: &[MenuRow<'_>], highlight: usize, inverse: bool) {
        let rows = rows
            .iter()
            .map(|r| if r.group { format!("[{}]", r.text) } else { r.text.into() })
            .collect();
        self.list = Some((rows, highlight, inverse));
    }

    fn commit(&mut self) {
        self.commits += 1;
        if let Some(list) = &self.list {
            self.committed_lists.push(list.clone());
        }
    }
}

/// 128x64 framebuffer.
pub struct FakeScreen {
    pixels: Vec<bool>,
    pub presents: usize,
}

impl Default for FakeScreen {
    fn default() -> Self {
        Self {
            pixels: alloc::vec![false; 128 * 64],
            presents: 0,
        }
    }
}

impl FakeScreen {
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }
}

impl OriginDimensions for FakeScreen {
    fn size(&self) -> Size {
        Size::new(128, 64)
    }
}

impl DrawTarget for FakeScreen {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, color) in pixels {
            if (0..128).contains(&p.x) && (0..64).contains(&p.y) {
                self.pixels[p.y as usize * 128 + p.x as usize] = color.is_on();
            }
        }
        Ok(())
    }
}

impl Surface for FakeScreen {
    fn present(&mut self) {
        self.presents += 1;
    }
}

#[derive(Default)]
pub struct FakePixels {
    pub frames: Vec<[u32; KEY_COUNT]>,
}

impl PixelStrip for FakePixels {
    fn show(&mut self, colors: &[u32; KEY_COUNT]) {
        self.frames.push(*colors);
    }
}
