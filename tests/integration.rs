//! Integration tests for hotkeypad: the dispatcher driven end to end through
//! the real panel, HID actuator and catalog loader, with only the pins,
//! screen and clock faked.

use std::cell::Cell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::ops::Deref;
use std::rc::Rc;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal::delay::DelayNs;

use hotkeypad::action::{ActionSpec, Op};
use hotkeypad::catalog::{self, builtin, AppDefinition, BlobSource, Catalog, KeySlot};
use hotkeypad::config::KEY_COUNT;
use hotkeypad::dispatcher::{Dispatcher, Parts, EMPTY_CATALOG_MESSAGE};
use hotkeypad::hid::keyboard::keycode;
use hotkeypad::hid::{HidOutput, HidReport, ReportActuator};
use hotkeypad::storage::MemoryBackend;
use hotkeypad::ui::display::{Panel, PixelStrip, Surface};
use hotkeypad::ui::{Clock, Controls, DisplaySink, KeyEvent, MenuRow};
use hotkeypad::{Config, Error};

// ═══════════════════════════════════════════════════════════════════════════
// Board fakes
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
struct TestClock(Rc<Cell<u64>>);

impl TestClock {
    fn now(&self) -> u64 {
        self.0.get()
    }
}

impl DelayNs for TestClock {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns.div_ceil(1_000_000)));
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u64 {
        self.now()
    }
}

enum Step {
    Turn(i32),
    Click,
    Press(u8),
    Release(u8),
}

/// Inputs released to the dispatcher as the clock passes their timestamps.
struct Script {
    clock: TestClock,
    steps: VecDeque<(u64, Step)>,
    position: i32,
    clicked: bool,
    keys: VecDeque<KeyEvent>,
}

impl Script {
    fn new(clock: &TestClock, steps: Vec<(u64, Step)>) -> Self {
        Self {
            clock: clock.clone(),
            steps: steps.into(),
            position: 0,
            clicked: false,
            keys: VecDeque::new(),
        }
    }

    fn pump(&mut self) {
        while self.steps.front().is_some_and(|(t, _)| *t <= self.clock.now()) {
            match self.steps.pop_front().map(|(_, step)| step) {
                Some(Step::Turn(d)) => self.position += d,
                Some(Step::Click) => self.clicked = true,
                Some(Step::Press(k)) => self.keys.push_back(KeyEvent::press(k)),
                Some(Step::Release(k)) => self.keys.push_back(KeyEvent::release(k)),
                None => {}
            }
        }
    }
}

impl Controls for Script {
    fn encoder_position(&mut self) -> i32 {
        self.pump();
        self.position
    }

    fn encoder_pressed(&mut self) -> bool {
        self.pump();
        std::mem::take(&mut self.clicked)
    }

    fn next_key_event(&mut self) -> Option<KeyEvent> {
        self.pump();
        self.keys.pop_front()
    }
}

#[derive(Default)]
struct Screen {
    lit: usize,
    presents: usize,
}

impl OriginDimensions for Screen {
    fn size(&self) -> Size {
        Size::new(128, 64)
    }
}

impl DrawTarget for Screen {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.lit += pixels.into_iter().filter(|Pixel(_, c)| c.is_on()).count();
        Ok(())
    }
}

impl Surface for Screen {
    fn present(&mut self) {
        self.presents += 1;
    }
}

#[derive(Default)]
struct Pixels {
    last: [u32; KEY_COUNT],
}

impl PixelStrip for Pixels {
    fn show(&mut self, colors: &[u32; KEY_COUNT]) {
        self.last = *colors;
    }
}

/// Menu frame as committed: rows, highlighted row, inverted.
type MenuFrame = (Vec<String>, usize, bool);

/// Real panel that also keeps every menu frame it committed. The menu runs
/// to completion inside one dispatcher step.
struct Recorded {
    panel: Panel<Screen, Pixels>,
    menus: Vec<MenuFrame>,
}

impl Recorded {
    fn new() -> Self {
        Self {
            panel: Panel::new(Screen::default(), Pixels::default()),
            menus: Vec::new(),
        }
    }
}

impl Deref for Recorded {
    type Target = Panel<Screen, Pixels>;

    fn deref(&self) -> &Self::Target {
        &self.panel
    }
}

impl DisplaySink for Recorded {
    fn set_key_color(&mut self, index: usize, rgb: u32) {
        self.panel.set_key_color(index, rgb);
    }

    fn set_key_label(&mut self, index: usize, text: &str) {
        self.panel.set_key_label(index, text);
    }

    fn set_title(&mut self, text: &str) {
        self.panel.set_title(text);
    }

    fn render_list(&mut self, rows: &[MenuRow<'_>], highlight: usize, inverse: bool) {
        self.panel.render_list(rows, highlight, inverse);
    }

    fn commit(&mut self) {
        self.panel.commit();
        if let Some((rows, highlight, inverse)) = self.panel.menu() {
            let rows = rows.into_iter().map(String::from).collect();
            self.menus.push((rows, highlight, inverse));
        }
    }
}

#[derive(Default)]
struct Host {
    reports: Vec<HidReport>,
    tone: Option<u16>,
}

impl HidOutput for Host {
    fn send(&mut self, report: HidReport) {
        self.reports.push(report);
    }

    fn tone(&mut self, freq: Option<u16>) {
        self.tone = freq;
    }
}

type Pad<'c, 'b> = Dispatcher<'c, Recorded, ReportActuator<Host>, Script, TestClock, &'b mut MemoryBackend>;

fn boot<'c, 'b>(
    catalog: &'c Catalog,
    clock: &TestClock,
    steps: Vec<(u64, Step)>,
    storage: &'b mut MemoryBackend,
) -> Result<Pad<'c, 'b>, Error> {
    let parts = Parts {
        display: Recorded::new(),
        actuator: ReportActuator::new(Host::default()),
        controls: Script::new(clock, steps),
        clock: clock.clone(),
        favorites: storage,
    };
    Dispatcher::boot(catalog, parts, Config::default())
}

fn run_until(pad: &mut Pad<'_, '_>, clock: &TestClock, until_ms: u64) {
    while clock.now() < until_ms {
        pad.step();
    }
}

fn builtin_catalog() -> Catalog {
    catalog::load(&builtin::StaticSource, builtin::ROOT).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn boots_into_first_app_of_first_folder() {
    let catalog = builtin_catalog();
    let clock = TestClock::default();
    let mut storage = MemoryBackend::new();
    let pad = boot(&catalog, &clock, vec![], &mut storage).unwrap();

    let panel = pad.display();
    assert_eq!(pad.current_app().name(), "Nav");
    assert_eq!(panel.title(), "Nav");
    assert_eq!(panel.label(0), Some("PgUp"));
    assert_eq!(panel.pixels().last[0], 0x333333);
    assert!(panel.surface().presents >= 1);
    assert!(panel.surface().lit > 0);
}

#[test]
fn app_switch_releases_a_stuck_chord() {
    let catalog = builtin_catalog();
    let clock = TestClock::default();
    let mut storage = MemoryBackend::new();
    // "Close" (GUI+W) pressed and never released, then rotate to Tabs.
    let steps = vec![(10, Step::Press(9)), (50, Step::Turn(1))];
    let mut pad = boot(&catalog, &clock, steps, &mut storage).unwrap();

    run_until(&mut pad, &clock, 30);
    assert!(pad.actuator().keyboard().is_pressed(keycode::W));

    run_until(&mut pad, &clock, 100);
    assert_eq!(pad.current_app().name(), "Tabs");
    assert!(pad.actuator().keyboard().is_empty());
    match pad.actuator().output().reports.last() {
        Some(HidReport::Keyboard(report)) => assert!(report.is_empty()),
        other => panic!("expected a cleared keyboard report, got {:?}", other),
    }
}

#[test]
fn tap_dance_key_copies_on_tap_and_cuts_on_double_tap() {
    let catalog = builtin_catalog();
    let clock = TestClock::default();
    let mut storage = MemoryBackend::new();
    let steps = vec![
        (100, Step::Press(7)),
        (150, Step::Release(7)),
        (300, Step::Press(7)),
        (350, Step::Release(7)),
    ];
    let mut pad = boot(&catalog, &clock, steps, &mut storage).unwrap();

    run_until(&mut pad, &clock, 400);

    let pressed: Vec<u8> = pad
        .actuator()
        .output()
        .reports
        .iter()
        .filter_map(|r| match r {
            HidReport::Keyboard(k) if k.modifier != 0 && k.keycodes[0] != 0 => Some(k.keycodes[0]),
            _ => None,
        })
        .collect();
    assert_eq!(pressed, vec![keycode::C, keycode::X]);
    assert!(pad.actuator().keyboard().is_empty());
}

#[test]
fn favorite_survives_reboot() {
    let catalog = builtin_catalog();
    let mut storage = MemoryBackend::new();

    // Favorites is the second top-level entry, Media the third.
    let clock = TestClock::default();
    let steps = vec![
        (10, Step::Click),
        (20, Step::Turn(1)),
        (30, Step::Click),
        (300, Step::Press(9)),
        (310, Step::Release(9)),
        (1_400, Step::Click),
        (1_410, Step::Turn(2)),
        (1_420, Step::Click),
        (1_700, Step::Press(0)),
        (1_710, Step::Release(0)),
    ];
    {
        let mut pad = boot(&catalog, &clock, steps, &mut storage).unwrap();
        run_until(&mut pad, &clock, 3_000);
        assert_eq!(pad.current_app().name(), "Media");
        assert_eq!(pad.display().title(), "Media");
    }
    assert!(storage.bytes().is_some());

    let clock = TestClock::default();
    let steps = vec![
        (10, Step::Click),
        (20, Step::Turn(1)),
        (30, Step::Click),
        (300, Step::Press(0)),
        (310, Step::Release(0)),
    ];
    let mut pad = boot(&catalog, &clock, steps, &mut storage).unwrap();
    run_until(&mut pad, &clock, 250);
    assert_eq!(pad.current_app().name(), "Favorites");

    run_until(&mut pad, &clock, 400);
    assert_eq!(pad.current_app().name(), "Media");
    assert!(pad.current_path().is_top_level());
}

#[test]
fn menu_timeout_restores_key_grid() {
    let catalog = builtin_catalog();
    let clock = TestClock::default();
    let mut storage = MemoryBackend::new();
    let steps = vec![(10, Step::Click), (20, Step::Turn(3))];
    let mut pad = boot(&catalog, &clock, steps, &mut storage).unwrap();

    run_until(&mut pad, &clock, 4_000);

    let menus = &pad.display().menus;
    let listed: Vec<String> = ["[arc]", "Favorites", "Media", "Numpad"].map(String::from).to_vec();
    assert_eq!(menus.first(), Some(&(listed.clone(), 0, false)));
    assert_eq!(menus.last(), Some(&(listed, 3, false)));
    assert!(menus.iter().all(|(_, _, inverse)| !inverse), "timeout must not flash");

    assert!(pad.display().menu().is_none());
    assert_eq!(pad.display().title(), "Nav");
    assert_eq!(pad.current_app().name(), "Nav");
}

fn definition(name: &str, keys: usize) -> AppDefinition {
    AppDefinition {
        name: name.into(),
        keys: (0..keys)
            .map(|i| KeySlot::new(0x0000FF, "k", ActionSpec::Simple(vec![Op::text(&i.to_string())])))
            .collect(),
    }
}

#[test]
fn blob_catalog_skips_bad_definitions() {
    let good = catalog::encode_definition(&definition("Good", 13)).unwrap();
    let huge = catalog::encode_definition(&definition("Huge", 20)).unwrap();
    let files: [(&str, &[u8]); 3] = [
        ("/defs/good.app", good.as_slice()),
        ("/defs/huge.app", huge.as_slice()),
        ("/defs/junk.app", &[0xFFu8; 4][..]),
    ];

    let catalog = catalog::load(&BlobSource::new(&files), "/defs").unwrap();

    assert_eq!(catalog.app_count(), 1);
    let path = catalog.first_app().unwrap();
    let app = catalog.app(&path).unwrap();
    assert_eq!(app.name(), "Good");
    assert_eq!(app.keys().len(), KEY_COUNT);
    assert_eq!(app.id().filename, "good.app");
}

#[test]
fn empty_catalog_shows_error_and_sends_nothing() {
    let files: [(&str, &[u8]); 1] = [("/defs/junk.app", &[0xFFu8][..])];
    assert_eq!(
        catalog::load(&BlobSource::new(&files), "/defs").err(),
        Some(Error::EmptyCatalog)
    );

    let catalog = Catalog::default();
    let clock = TestClock::default();
    let mut storage = MemoryBackend::new();
    let mut panel = Panel::new(Screen::default(), Pixels::default());
    let mut host = ReportActuator::new(Host::default());
    let parts = Parts {
        display: &mut panel,
        actuator: &mut host,
        controls: Script::new(&clock, vec![]),
        clock: clock.clone(),
        favorites: &mut storage,
    };

    let failure = Dispatcher::boot(&catalog, parts, Config::default()).err();

    assert_eq!(failure, Some(Error::EmptyCatalog));
    assert_eq!(panel.title(), EMPTY_CATALOG_MESSAGE);
    assert!(host.output().reports.is_empty());
    assert_eq!(host.output().tone, None);
}
