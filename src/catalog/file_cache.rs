//! Catalog source that answers from cache records on disk.

use crate::catalog::{CatalogSource, SourceError};
use crate::foundation::cache::{CacheError, CacheStore};
use crate::foundation::models::{Album, Track};
use async_trait::async_trait;
use tracing::info;

/// Reads artist records written by [`CacheStore::persist`]. Never writes.
pub struct FileCacheSource {
    store: CacheStore,
}

impl FileCacheSource {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CatalogSource for FileCacheSource {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn is_cache(&self) -> bool {
        true
    }

    /// Reads the record keyed by the artist name and `limit`.
    async fn fetch_albums(&self, artist_name: &str, limit: usize) -> Result<Vec<Album>, SourceError> {
        let artist = self.store.load(artist_name, limit).map_err(unavailable)?;
        info!(
            "Loaded {} {} albums from cache",
            artist.albums.len(),
            artist.name
        );
        Ok(artist.albums)
    }

    async fn fetch_tracks(&self, album_id: u64) -> Result<Vec<Track>, SourceError> {
        match self.store.find_album(album_id).map_err(unavailable)? {
            Some(album) => Ok(album.tracks),
            None => Err(SourceError::Unavailable(format!(
                "album {} is not cached",
                album_id
            ))),
        }
    }

    async fn search_albums(&self, _term: &str, _limit: usize) -> Result<Vec<Album>, SourceError> {
        Err(SourceError::Unavailable(
            "cache records are keyed by artist".to_string(),
        ))
    }

    async fn search_tracks(&self, _term: &str, _limit: usize) -> Result<Vec<Track>, SourceError> {
        Err(SourceError::Unavailable(
            "cache records are keyed by artist".to_string(),
        ))
    }
}

fn unavailable(error: CacheError) -> SourceError {
    SourceError::Unavailable(error.to_string())
}
