//! Library interface for hotkeypad.
//!
//! Everything except board bring-up lives here: the catalog, the macro
//! executor, tap dance, favorites, the app menu and the dispatcher that ties
//! them together. All of it talks to hardware through the traits in
//! [`ui`], [`action`], [`hid`] and [`storage`], so it builds and tests on
//! the host.
//!
//! Usage: `cargo test --lib` (host) or `cargo run --release --features embedded`.
//!
//! Note: the embedded binary is main.rs with #![no_std] and #![no_main];
//! it only wires board peripherals into [`dispatcher::Dispatcher`].

#![cfg_attr(not(test), no_std)]

extern crate alloc;

// ═══════════════════════════════════════════════════════════════════════════
// Control core
// ═══════════════════════════════════════════════════════════════════════════

pub mod action;
pub mod catalog;
pub mod dispatcher;
pub mod favorites;
pub mod menu;
pub mod tap_dance;

// ═══════════════════════════════════════════════════════════════════════════
// Hardware seams
// ═══════════════════════════════════════════════════════════════════════════

pub mod hid;
pub mod storage;
pub mod ui;

#[cfg(feature = "embedded")]
pub mod board;
#[cfg(feature = "embedded")]
pub mod usb;

// ═══════════════════════════════════════════════════════════════════════════
// Shared
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod error;

#[cfg(test)]
mod testing;

pub use catalog::{Application, Catalog, CatalogEntry};
pub use config::Config;
pub use dispatcher::{Dispatcher, Mode, Parts};
pub use error::Error;
