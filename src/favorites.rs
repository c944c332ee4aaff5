//! Favorite slots: small integers bound to apps, persisted across reboots.
//!
//! There is no cache. Every lookup reads the whole table back from the
//! backend and every assignment rewrites it, so what is in storage is
//! always what the user last set. A missing or unreadable table is an
//! empty table.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

#[cfg(feature = "defmt")]
use defmt::{debug, info, warn};
#[cfg(not(feature = "defmt"))]
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::catalog::{AppId, Application};
use crate::error::Error;
use crate::storage::FavoritesBackend;

/// Stored binding target. `name` is informational; lookups match on
/// `filename` + `folder`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub name: String,
    pub filename: String,
    pub folder: String,
}

impl FavoriteRecord {
    pub fn app_id(&self) -> AppId {
        AppId {
            folder: self.folder.clone(),
            filename: self.filename.clone(),
        }
    }
}

/// Persisted layout: stringified slot -> record.
pub type FavoritesTable = BTreeMap<String, FavoriteRecord>;

/// Commands bound to the keys of the favorites app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FavoriteCommand {
    /// Arm assignment: the next key press binds the current app.
    SetFavorite,
    /// Jump to the first app of the catalog.
    BackToMain,
    /// Recall a slot (0-based; `FAVORITE_1` is slot 0).
    Recall(u8),
}

impl FavoriteCommand {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "SET_FAVORITE" => Some(Self::SetFavorite),
            "BACK_TO_MAIN" => Some(Self::BackToMain),
            _ => {
                let n: u8 = name.strip_prefix("FAVORITE_")?.parse().ok()?;
                n.checked_sub(1).map(Self::Recall)
            }
        }
    }
}

pub struct Favorites<B> {
    backend: B,
}

impl<B: FavoritesBackend> Favorites<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current table from storage; empty when absent or corrupt.
    pub fn table(&mut self) -> FavoritesTable {
        match self.backend.load() {
            Ok(Some(bytes)) => postcard::from_bytes(&bytes).unwrap_or_else(|_| {
                warn!("favorites: stored table unreadable, starting empty");
                FavoritesTable::new()
            }),
            Ok(None) => FavoritesTable::new(),
            Err(e) => {
                warn!("favorites: load failed: {}", e);
                FavoritesTable::new()
            }
        }
    }

    /// Bind `slot` to `app`, overwriting any earlier binding.
    pub fn set(&mut self, slot: u8, app: &Application) -> Result<(), Error> {
        let mut table = self.table();
        table.insert(
            slot.to_string(),
            FavoriteRecord {
                name: app.name().into(),
                filename: app.id().filename.clone(),
                folder: app.id().folder.clone(),
            },
        );
        let bytes = postcard::to_allocvec(&table)?;
        self.backend.store(&bytes)?;
        info!("favorites: slot {} = {}", slot, app.name());
        Ok(())
    }

    /// App identity bound to `slot`, if any.
    pub fn get(&mut self, slot: u8) -> Option<AppId> {
        let found = self.table().get(&slot.to_string()).map(FavoriteRecord::app_id);
        if found.is_none() {
            debug!("favorites: slot {} empty", slot);
        }
        found
    }
}
