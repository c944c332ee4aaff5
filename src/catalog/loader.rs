//! Builds the [`Catalog`] from a tree of postcard-encoded definitions.
//!
//! Paths are sorted one segment at a time, so inside every folder the
//! entries appear in name order (a folder named `a` sorts before a file
//! named `a.app`). Definitions that fail to decode are logged and skipped;
//! folders left without any app are dropped.

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "defmt")]
use defmt::{debug, info, warn};
#[cfg(not(feature = "defmt"))]
use log::{debug, info, warn};

use super::{AppDefinition, AppId, Application, Catalog, CatalogEntry};
use crate::config::KEY_COUNT;
use crate::error::Error;

/// Provider of app definitions, addressed by `/`-separated path.
pub trait CatalogSource {
    /// Every definition path below `root`, in any order.
    fn paths(&self) -> Vec<String>;

    /// Decode the definition at `path`.
    fn read(&self, path: &str) -> Result<AppDefinition, Error>;
}

/// Definitions baked in as postcard blobs.
pub struct BlobSource<'a> {
    files: &'a [(&'a str, &'a [u8])],
}

impl<'a> BlobSource<'a> {
    pub fn new(files: &'a [(&'a str, &'a [u8])]) -> Self {
        Self { files }
    }
}

impl CatalogSource for BlobSource<'_> {
    fn paths(&self) -> Vec<String> {
        self.files.iter().map(|(path, _)| String::from(*path)).collect()
    }

    fn read(&self, path: &str) -> Result<AppDefinition, Error> {
        let (_, bytes) = self
            .files
            .iter()
            .find(|(p, _)| *p == path)
            .ok_or(Error::Decode)?;
        Ok(postcard::from_bytes(bytes)?)
    }
}

/// Serialize a definition into the blob format [`BlobSource`] reads.
pub fn encode_definition(definition: &AppDefinition) -> Result<Vec<u8>, Error> {
    Ok(postcard::to_allocvec(definition)?)
}

/// Load every definition under `root` into a catalog.
///
/// Fails only when no app at all could be loaded.
pub fn load<S: CatalogSource + ?Sized>(source: &S, root: &str) -> Result<Catalog, Error> {
    let root = root.trim_end_matches('/');
    let paths = source.paths();

    let mut files: Vec<(Vec<&str>, &str)> = paths
        .iter()
        .filter_map(|path| {
            let relative = path.strip_prefix(root)?.strip_prefix('/')?;
            let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();
            let hidden = segments.last().map_or(true, |name| name.starts_with("._"));
            (!hidden).then_some((segments, path.as_str()))
        })
        .collect();
    files.sort();

    let entries = build_level(source, &files, 0, root);
    let catalog = Catalog::new(entries);
    if catalog.is_empty() {
        warn!("catalog: nothing loadable under {}", root);
        return Err(Error::EmptyCatalog);
    }
    info!("catalog: {} apps loaded", catalog.app_count());
    Ok(catalog)
}

/// Entries of one folder. `files` all share the same first `depth` segments.
fn build_level<S: CatalogSource + ?Sized>(
    source: &S,
    files: &[(Vec<&str>, &str)],
    depth: usize,
    folder: &str,
) -> Vec<CatalogEntry> {
    let mut entries = Vec::new();
    let mut i = 0;
    while i < files.len() {
        let (segments, path) = &files[i];
        let name = segments[depth];

        if segments.len() == depth + 1 {
            if let Some(app) = load_app(source, path, folder, name) {
                entries.push(CatalogEntry::Leaf(app));
            }
            i += 1;
            continue;
        }

        let end = files[i..]
            .iter()
            .position(|(s, _)| s.len() <= depth + 1 || s[depth] != name)
            .map_or(files.len(), |n| i + n);

        let mut sub_folder = String::from(folder);
        sub_folder.push('/');
        sub_folder.push_str(name);
        let inner = build_level(source, &files[i..end], depth + 1, &sub_folder);
        if inner.is_empty() {
            debug!("catalog: folder {} has no apps", name);
        } else {
            entries.push(CatalogEntry::Group {
                name: String::from(name),
                entries: inner,
            });
        }
        i = end;
    }
    entries
}

fn load_app<S: CatalogSource + ?Sized>(
    source: &S,
    path: &str,
    folder: &str,
    filename: &str,
) -> Option<Application> {
    let checked = source.read(path).and_then(fit_to_pad);
    match checked {
        Ok(definition) => Some(Application::new(
            AppId {
                folder: String::from(folder),
                filename: String::from(filename),
            },
            definition,
        )),
        Err(e) => {
            warn!("catalog: skipping {}: {}", path, e);
            None
        }
    }
}

/// A 13th binding is the encoder-press slot some definitions carry; it has
/// no key on this pad and is dropped. Anything beyond that is malformed.
fn fit_to_pad(mut definition: AppDefinition) -> Result<AppDefinition, Error> {
    match definition.keys.len() {
        n if n <= KEY_COUNT => Ok(definition),
        n if n == KEY_COUNT + 1 => {
            definition.keys.truncate(KEY_COUNT);
            Ok(definition)
        }
        n => Err(Error::TooManyKeys(n)),
    }
}
