//! The app catalog: every macro app found at boot, arranged in folders.
//!
//! The catalog is built once and only read afterwards. Apps are addressed
//! by [`AppPath`], a list of child indices from the top level down, so the
//! dispatcher can hold on to "the current app" without copying it.

pub mod builtin;
mod loader;

pub use loader::{encode_definition, load, BlobSource, CatalogSource};

use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::action::ActionSpec;
use crate::config::FAVORITES_APP_NAME;

/// One key binding as written in a definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySlot {
    /// 0xRRGGBB backlight color.
    pub color: u32,
    pub label: String,
    pub action: ActionSpec,
}

impl KeySlot {
    pub fn new(color: u32, label: &str, action: ActionSpec) -> Self {
        Self {
            color,
            label: String::from(label),
            action,
        }
    }
}

/// Serialized form of an app.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppDefinition {
    pub name: String,
    pub keys: Vec<KeySlot>,
}

/// Where an app was loaded from. Stable across reboots.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppId {
    pub folder: String,
    pub filename: String,
}

/// A loaded macro app.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Application {
    id: AppId,
    name: String,
    keys: Vec<KeySlot>,
}

impl Application {
    pub fn new(id: AppId, definition: AppDefinition) -> Self {
        Self {
            id,
            name: definition.name,
            keys: definition.keys,
        }
    }

    pub fn id(&self) -> &AppId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keys(&self) -> &[KeySlot] {
        &self.keys
    }

    pub fn key(&self, index: usize) -> Option<&KeySlot> {
        self.keys.get(index)
    }

    /// Keys of this app run favorites commands instead of macros.
    pub fn is_favorites(&self) -> bool {
        self.name == FAVORITES_APP_NAME
    }
}

/// Top-level or nested catalog item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CatalogEntry {
    Leaf(Application),
    Group { name: String, entries: Vec<CatalogEntry> },
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        match self {
            CatalogEntry::Leaf(app) => app.name(),
            CatalogEntry::Group { name, .. } => name,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, CatalogEntry::Group { .. })
    }
}

/// Child indices from the top level down to an app.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppPath(Vec<usize>);

impl AppPath {
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// True for apps sitting directly in the catalog root.
    pub fn is_top_level(&self) -> bool {
        self.0.len() <= 1
    }

    fn parent(&self) -> &[usize] {
        match self.0.split_last() {
            Some((_, parent)) => parent,
            None => &[],
        }
    }
}

/// Read-only tree of apps and folders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.first_app().is_none()
    }

    /// Number of apps at any depth.
    pub fn app_count(&self) -> usize {
        fn count(entries: &[CatalogEntry]) -> usize {
            entries
                .iter()
                .map(|e| match e {
                    CatalogEntry::Leaf(_) => 1,
                    CatalogEntry::Group { entries, .. } => count(entries),
                })
                .sum()
        }
        count(&self.entries)
    }

    /// First app in catalog order, descending into leading folders.
    pub fn first_app(&self) -> Option<AppPath> {
        let mut path = Vec::new();
        first_leaf(&self.entries, &mut path).then(|| AppPath(path))
    }

    /// App a top-level entry stands for: itself, or a folder's first app.
    pub fn app_for_entry(&self, index: usize) -> Option<AppPath> {
        let mut path = alloc::vec![index];
        match self.entries.get(index)? {
            CatalogEntry::Leaf(_) => Some(AppPath(path)),
            CatalogEntry::Group { entries, .. } => first_leaf(entries, &mut path).then(|| AppPath(path)),
        }
    }

    pub fn entry(&self, path: &AppPath) -> Option<&CatalogEntry> {
        let (last, parent) = path.0.split_last()?;
        self.children(parent)?.get(*last)
    }

    pub fn app(&self, path: &AppPath) -> Option<&Application> {
        match self.entry(path)? {
            CatalogEntry::Leaf(app) => Some(app),
            CatalogEntry::Group { .. } => None,
        }
    }

    /// Locate an app by where it was loaded from.
    pub fn find(&self, id: &AppId) -> Option<AppPath> {
        fn search(entries: &[CatalogEntry], id: &AppId, path: &mut Vec<usize>) -> bool {
            for (i, entry) in entries.iter().enumerate() {
                path.push(i);
                let found = match entry {
                    CatalogEntry::Leaf(app) => app.id() == id,
                    CatalogEntry::Group { entries, .. } => search(entries, id, path),
                };
                if found {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        search(&self.entries, id, &mut path).then(|| AppPath(path))
    }

    /// App `delta` places away from `path` inside the same folder, wrapping.
    ///
    /// Folders among the siblings stand for their first app. Top-level apps
    /// have no siblings in this sense and yield `None`.
    pub fn sibling(&self, path: &AppPath, delta: i32) -> Option<AppPath> {
        if path.is_top_level() {
            return None;
        }
        let parent = path.parent();
        let siblings = self.children(parent)?;
        let current = *path.0.last()? as i64;
        let index = (current + i64::from(delta)).rem_euclid(siblings.len() as i64) as usize;

        let mut next = parent.to_vec();
        next.push(index);
        match &siblings[index] {
            CatalogEntry::Leaf(_) => Some(AppPath(next)),
            CatalogEntry::Group { entries, .. } => first_leaf(entries, &mut next).then(|| AppPath(next)),
        }
    }

    /// Entries directly inside the folder at `parent` (empty slice = root).
    fn children(&self, parent: &[usize]) -> Option<&[CatalogEntry]> {
        let mut entries = self.entries.as_slice();
        for &i in parent {
            match entries.get(i)? {
                CatalogEntry::Group { entries: inner, .. } => entries = inner,
                CatalogEntry::Leaf(_) => return None,
            }
        }
        Some(entries)
    }
}

/// Push indices down to the first app under `entries`.
fn first_leaf(entries: &[CatalogEntry], path: &mut Vec<usize>) -> bool {
    for (i, entry) in entries.iter().enumerate() {
        path.push(i);
        match entry {
            CatalogEntry::Leaf(_) => return true,
            CatalogEntry::Group { entries, .. } => {
                if first_leaf(entries, path) {
                    return true;
                }
            }
        }
        path.pop();
    }
    false
}
