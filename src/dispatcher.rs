//! Mode dispatcher: the control loop's state machine.
//!
//! One [`Dispatcher::step`] is one loop tick: encoder switch, encoder
//! rotation, at most one key event, the tap-dance hold check, then the idle
//! delay. Everything the dispatcher touches is injected through [`Parts`],
//! so the same code runs on the board and against the fakes in tests.
//!
//! ## Key routing
//!
//! In priority order:
//! 1. a pending favorite assignment takes the next key press
//! 2. keys of the favorites app run favorites commands
//! 3. anything else runs the key's macro (directly or via tap dance)
//!
//! After any of them the key's LED shows [`PRESSED_COLOR`] while held and
//! the current app's color once released. Keys the app does not bind run
//! nothing but still light up.

#[cfg(feature = "defmt")]
use defmt::{debug, error, info, warn};
#[cfg(not(feature = "defmt"))]
use log::{debug, error, info, warn};

use crate::action::{execute, ActionSpec, Actuator, Phase};
use crate::catalog::{AppPath, Application, Catalog, KeySlot};
use crate::config::{Config, KEY_COUNT, PRESSED_COLOR};
use crate::error::Error;
use crate::favorites::{FavoriteCommand, Favorites};
use crate::menu::Navigator;
use crate::storage::FavoritesBackend;
use crate::tap_dance::TapDance;
use crate::ui::{Clock, Controls, DisplaySink, KeyEvent};

/// Title shown when boot finds nothing to run.
pub const EMPTY_CATALOG_MESSAGE: &str = "NO MACRO FILES FOUND";
pub const SET_FAVORITE_MESSAGE: &str = "Set Favorite";
pub const FAVORITE_SET_MESSAGE: &str = "Favorite Set";

/// Top-level dispatcher state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Normal,
    /// The menu owns the loop.
    MenuOpen,
    /// The next key press binds the current app to that key's slot.
    AwaitingFavoriteAssignment,
}

/// Collaborators handed to [`Dispatcher::boot`].
pub struct Parts<D, A, C, K, B> {
    pub display: D,
    pub actuator: A,
    pub controls: C,
    pub clock: K,
    pub favorites: B,
}

pub struct Dispatcher<'c, D, A, C, K, B> {
    catalog: &'c Catalog,
    config: Config,
    navigator: Navigator,
    display: D,
    actuator: A,
    controls: C,
    clock: K,
    favorites: Favorites<B>,
    tap_dance: TapDance,
    current: &'c Application,
    current_path: AppPath,
    mode: Mode,
    last_position: i32,
}

impl<'c, D, A, C, K, B> Dispatcher<'c, D, A, C, K, B>
where
    D: DisplaySink,
    A: Actuator,
    C: Controls,
    K: Clock,
    B: FavoritesBackend,
{
    /// Switch to the first app of `catalog` and get ready to loop.
    ///
    /// An empty catalog leaves [`EMPTY_CATALOG_MESSAGE`] on the display and
    /// returns [`Error::EmptyCatalog`]; the caller is expected to halt.
    pub fn boot(catalog: &'c Catalog, parts: Parts<D, A, C, K, B>, config: Config) -> Result<Self, Error> {
        let Parts {
            mut display,
            actuator,
            mut controls,
            clock,
            favorites,
        } = parts;

        let first = catalog.first_app();
        let Some((path, app)) = first.and_then(|p| catalog.app(&p).map(|a| (p, a))) else {
            error!("boot: catalog is empty");
            for index in 0..KEY_COUNT {
                display.set_key_color(index, 0);
                display.set_key_label(index, "");
            }
            display.set_title(EMPTY_CATALOG_MESSAGE);
            display.commit();
            return Err(Error::EmptyCatalog);
        };

        let last_position = controls.encoder_position();
        let mut dispatcher = Self {
            catalog,
            navigator: Navigator::new(&config),
            tap_dance: TapDance::new(config.tap_dance),
            config,
            display,
            actuator,
            controls,
            clock,
            favorites: Favorites::new(favorites),
            current: app,
            current_path: path.clone(),
            mode: Mode::Normal,
            last_position,
        };
        info!("boot: {} apps", catalog.app_count());
        dispatcher.switch_to(path);
        Ok(dispatcher)
    }

    /// Loop forever.
    pub fn run(&mut self) -> ! {
        loop {
            self.step();
        }
    }

    /// One loop tick including the idle delay.
    pub fn step(&mut self) {
        self.poll();
        self.clock.delay_ms(self.config.timing.tick_ms);
    }

    /// One loop tick without the idle delay.
    pub fn poll(&mut self) {
        if self.controls.encoder_pressed() {
            self.open_menu();
        }

        let position = self.controls.encoder_position();
        if position != self.last_position {
            let delta = position.wrapping_sub(self.last_position);
            self.last_position = position;
            self.rotate(delta);
        }

        if let Some(event) = self.controls.next_key_event() {
            self.handle_key(event);
        }

        self.tap_dance.poll(self.clock.now_ms());
    }

    pub fn current_app(&self) -> &'c Application {
        self.current
    }

    pub fn current_path(&self) -> &AppPath {
        &self.current_path
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    pub fn favorites(&mut self) -> &mut Favorites<B> {
        &mut self.favorites
    }

    fn open_menu(&mut self) {
        let resume = self.mode;
        self.mode = Mode::MenuOpen;
        let picked = self.navigator.navigate(
            self.catalog.entries(),
            &mut self.controls,
            &mut self.display,
            &mut self.clock,
        );
        // Rotation spent in the menu must not turn into folder cycling.
        self.last_position = self.controls.encoder_position();
        self.mode = resume;

        match picked.and_then(|index| self.catalog.app_for_entry(index)) {
            Some(path) => self.switch_to(path),
            None => {
                self.draw_app();
                self.display.commit();
            }
        }
    }

    /// Cycle through the current folder. Top-level apps ignore rotation.
    fn rotate(&mut self, delta: i32) {
        if let Some(path) = self.catalog.sibling(&self.current_path, delta) {
            self.switch_to(path);
        }
    }

    fn handle_key(&mut self, event: KeyEvent) {
        let KeyEvent { key, pressed } = event;
        let index = usize::from(key);
        if index >= KEY_COUNT {
            debug!("key {} out of range", key);
            return;
        }

        if pressed && self.mode == Mode::AwaitingFavoriteAssignment {
            self.assign_favorite(key);
        } else {
            let app = self.current;
            match app.key(index) {
                None => debug!("key {} unbound in {}", key, app.name()),
                Some(slot) if app.is_favorites() => {
                    if pressed {
                        self.run_favorites_command(slot);
                    }
                }
                Some(slot) => self.run_macro(key, slot, pressed),
            }
        }

        self.update_key_led(index, pressed);
    }

    fn assign_favorite(&mut self, slot: u8) {
        if let Err(e) = self.favorites.set(slot, self.current) {
            warn!("favorites: could not save slot {}: {}", slot, e);
        }
        self.mode = Mode::Normal;
        self.show_message(FAVORITE_SET_MESSAGE);
        self.switch_to(self.current_path.clone());
    }

    fn run_favorites_command(&mut self, slot: &KeySlot) {
        let command = slot.action.leading_command().and_then(FavoriteCommand::parse);
        match command {
            Some(FavoriteCommand::SetFavorite) => {
                info!("favorites: waiting for a key");
                self.mode = Mode::AwaitingFavoriteAssignment;
                self.show_message(SET_FAVORITE_MESSAGE);
            }
            Some(FavoriteCommand::BackToMain) => {
                if let Some(path) = self.catalog.first_app() {
                    self.switch_to(path);
                }
            }
            Some(FavoriteCommand::Recall(n)) => {
                let found = self.favorites.get(n).and_then(|id| self.catalog.find(&id));
                match found {
                    Some(path) => self.switch_to(path),
                    None => debug!("favorites: slot {} has no app", n),
                }
            }
            None => debug!("favorites: key has no command"),
        }
    }

    fn run_macro(&mut self, key: u8, slot: &KeySlot, pressed: bool) {
        let now = self.clock.now_ms();
        match &slot.action {
            ActionSpec::Simple(ops) => {
                let phase = if pressed { Phase::Press } else { Phase::Release };
                execute(ops, phase, &mut self.actuator, &mut self.clock);
            }
            ActionSpec::TapDance(_) if pressed => self.tap_dance.press(key, now),
            ActionSpec::TapDance(_) => {
                let gesture = self.tap_dance.release(key, now);
                if let Some(ops) = gesture.and_then(|g| slot.action.for_gesture(g)) {
                    execute(ops, Phase::Press, &mut self.actuator, &mut self.clock);
                    execute(ops, Phase::Release, &mut self.actuator, &mut self.clock);
                }
            }
        }
    }

    fn update_key_led(&mut self, index: usize, pressed: bool) {
        let color = if pressed {
            PRESSED_COLOR
        } else {
            self.current.key(index).map_or(0, |slot| slot.color)
        };
        self.display.set_key_color(index, color);
        self.display.commit();
    }

    /// App-switch side effect: redraw, then release everything latched.
    fn switch_to(&mut self, path: AppPath) {
        let Some(app) = self.catalog.app(&path) else {
            warn!("switch: no app at path");
            return;
        };
        self.current = app;
        self.current_path = path;
        self.draw_app();
        self.actuator.release_all();
        self.display.commit();
        info!("app: {}", app.name());
    }

    fn draw_app(&mut self) {
        let app = self.current;
        for index in 0..KEY_COUNT {
            match app.key(index) {
                Some(slot) => {
                    self.display.set_key_color(index, slot.color);
                    self.display.set_key_label(index, &slot.label);
                }
                None => {
                    self.display.set_key_color(index, 0);
                    self.display.set_key_label(index, "");
                }
            }
        }
        self.display.set_title(app.name());
    }

    /// Hold `text` on the title bar, blocking the loop.
    fn show_message(&mut self, text: &str) {
        self.display.set_title(text);
        self.display.commit();
        self.clock.delay_ms(self.config.timing.message_ms);
        self.display.set_title(self.current.name());
        self.display.commit();
    }
}

/// Park the core after a fatal boot error.
pub fn halt() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
