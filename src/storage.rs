//! Persistent storage for the favorites table.
//!
//! The table is opaque here: a single serialized blob that is read and
//! rewritten as a whole. On the board it lives in a reserved flash range
//! managed by `sequential-storage` (wear levelling and GC); on the host an
//! in-memory backend stands in.

use alloc::vec::Vec;

use crate::error::Error;

/// Whole-blob load/store of the favorites table.
pub trait FavoritesBackend {
    /// The stored blob, `Ok(None)` if nothing was ever written.
    fn load(&mut self) -> Result<Option<Vec<u8>>, Error>;

    /// Replace the stored blob.
    fn store(&mut self, data: &[u8]) -> Result<(), Error>;
}

impl<T: FavoritesBackend + ?Sized> FavoritesBackend for &mut T {
    fn load(&mut self) -> Result<Option<Vec<u8>>, Error> {
        (**self).load()
    }

    fn store(&mut self, data: &[u8]) -> Result<(), Error> {
        (**self).store(data)
    }
}

/// RAM-only backend. Contents are lost on reset.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Option<Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-loaded with `bytes`, as if written by an earlier boot.
    pub fn with_bytes(bytes: &[u8]) -> Self {
        Self {
            data: Some(bytes.to_vec()),
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }
}

impl FavoritesBackend for MemoryBackend {
    fn load(&mut self) -> Result<Option<Vec<u8>>, Error> {
        Ok(self.data.clone())
    }

    fn store(&mut self, data: &[u8]) -> Result<(), Error> {
        self.data = Some(data.to_vec());
        Ok(())
    }
}

#[cfg(feature = "embedded")]
pub use flash::FlashBackend;

#[cfg(feature = "embedded")]
mod flash {
    use alloc::vec::Vec;
    use core::ops::Range;

    use defmt::{debug, error};
    use embedded_storage_async::nor_flash::NorFlash;
    use sequential_storage::cache::NoCache;
    use sequential_storage::map;

    use super::FavoritesBackend;
    use crate::config::{MAX_FAVORITES_BLOB, STORAGE_FLASH_OFFSET, STORAGE_FLASH_SIZE};
    use crate::error::Error;

    /// Key of the favorites blob in the map storage.
    const KEY_FAVORITES: u8 = 0x01;

    /// Scratch space: item header and key around the blob.
    const BUFFER_SIZE: usize = MAX_FAVORITES_BLOB + 32;

    /// Favorites in on-chip flash, accessed from the blocking control loop.
    pub struct FlashBackend<F> {
        flash: F,
        range: Range<u32>,
    }

    impl<F: NorFlash> FlashBackend<F> {
        pub fn new(flash: F) -> Self {
            Self {
                flash,
                range: STORAGE_FLASH_OFFSET..STORAGE_FLASH_OFFSET + STORAGE_FLASH_SIZE,
            }
        }
    }

    impl<F: NorFlash> FavoritesBackend for FlashBackend<F> {
        fn load(&mut self) -> Result<Option<Vec<u8>>, Error> {
            let mut buf = [0u8; BUFFER_SIZE];
            let fetched = embassy_futures::block_on(map::fetch_item::<u8, &[u8], _>(
                &mut self.flash,
                self.range.clone(),
                &mut NoCache::new(),
                &mut buf,
                &KEY_FAVORITES,
            ));
            match fetched {
                Ok(Some(data)) => {
                    debug!("favorites: loaded {} bytes", data.len());
                    Ok(Some(data.to_vec()))
                }
                Ok(None) => Ok(None),
                Err(e) => {
                    error!("favorites: flash read error: {:?}", defmt::Debug2Format(&e));
                    Err(Error::Storage)
                }
            }
        }

        fn store(&mut self, data: &[u8]) -> Result<(), Error> {
            if data.len() > MAX_FAVORITES_BLOB {
                return Err(Error::Encode);
            }
            let mut buf = [0u8; BUFFER_SIZE];
            let stored = embassy_futures::block_on(map::store_item::<u8, &[u8], _>(
                &mut self.flash,
                self.range.clone(),
                &mut NoCache::new(),
                &mut buf,
                &KEY_FAVORITES,
                &data,
            ));
            stored.map_err(|e| {
                error!("favorites: flash write error: {:?}", defmt::Debug2Format(&e));
                Error::Storage
            })
        }
    }
}
