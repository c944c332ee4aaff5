//! Encoder-driven app menu.
//!
//! [`Navigator::navigate`] takes over the control loop until the user
//! commits a row with the encoder switch or stops touching the encoder for
//! the inactivity timeout. Nothing is kept between invocations; every
//! menu opens with the first entry selected.

use alloc::vec::Vec;

#[cfg(feature = "defmt")]
use defmt::debug;
#[cfg(not(feature = "defmt"))]
use log::debug;

use crate::catalog::CatalogEntry;
use crate::config::{Config, MenuConfig};
use crate::ui::input_logic::{rotate, visible_window};
use crate::ui::{Clock, Controls, DisplaySink, MenuRow};

#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    menu: MenuConfig,
    tick_ms: u32,
}

impl Navigator {
    pub fn new(config: &Config) -> Self {
        Self {
            menu: config.menu,
            tick_ms: config.timing.tick_ms,
        }
    }

    /// Run the menu over `entries`; returns the committed index.
    ///
    /// `None` on timeout (or an empty list). The caller redraws its own
    /// screen afterwards in either case.
    pub fn navigate<C, D, K>(
        &self,
        entries: &[CatalogEntry],
        controls: &mut C,
        display: &mut D,
        clock: &mut K,
    ) -> Option<usize>
    where
        C: Controls + ?Sized,
        D: DisplaySink + ?Sized,
        K: Clock + ?Sized,
    {
        if entries.is_empty() {
            return None;
        }
        debug!("menu: open, {} entries", entries.len());

        let mut selected = 0;
        let mut last_position = controls.encoder_position();
        self.show(entries, selected, false, display);
        let mut deadline = clock.now_ms() + self.menu.timeout_ms;

        loop {
            let position = controls.encoder_position();
            if position != last_position {
                selected = rotate(selected, position.wrapping_sub(last_position), entries.len());
                last_position = position;
                self.show(entries, selected, false, display);
                deadline = clock.now_ms() + self.menu.timeout_ms;
            }

            if controls.encoder_pressed() {
                self.flash(entries, selected, display, clock);
                debug!("menu: committed entry {}", selected);
                return Some(selected);
            }

            if clock.now_ms() > deadline {
                debug!("menu: timed out");
                return None;
            }

            clock.delay_ms(self.tick_ms);
        }
    }

    fn flash<D, K>(&self, entries: &[CatalogEntry], selected: usize, display: &mut D, clock: &mut K)
    where
        D: DisplaySink + ?Sized,
        K: Clock + ?Sized,
    {
        for _ in 0..self.menu.flash_count {
            self.show(entries, selected, true, display);
            clock.delay_ms(self.menu.flash_ms);
            self.show(entries, selected, false, display);
            clock.delay_ms(self.menu.flash_ms);
        }
    }

    fn show<D>(&self, entries: &[CatalogEntry], selected: usize, inverse: bool, display: &mut D)
    where
        D: DisplaySink + ?Sized,
    {
        let window = visible_window(selected, self.menu.rows, entries.len());
        let highlight = selected - window.start;
        let rows: Vec<MenuRow<'_>> = entries[window]
            .iter()
            .map(|entry| MenuRow {
                text: entry.name(),
                group: entry.is_group(),
            })
            .collect();
        display.render_list(&rows, highlight, inverse);
        display.commit();
    }
}
