use crate::catalog::SourceError;
use crate::foundation::models::{Album, Track};
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

/// A provider of album and track data.
///
/// Every method fails with [`SourceError::Unavailable`] when the underlying
/// medium cannot produce data, and returns an empty vector when the medium is
/// reachable but has nothing matching.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// True for sources that replay records written by [`CacheStore`].
    /// Their answers are never persisted again.
    ///
    /// [`CacheStore`]: crate::foundation::cache::CacheStore
    fn is_cache(&self) -> bool;

    /// Albums by `artist_name`, at most `limit` of them.
    async fn fetch_albums(&self, artist_name: &str, limit: usize) -> Result<Vec<Album>, SourceError>;

    /// Tracks of the album with `album_id`, ordered by disc then track number.
    async fn fetch_tracks(&self, album_id: u64) -> Result<Vec<Track>, SourceError>;

    /// Albums whose title matches `term`.
    async fn search_albums(&self, term: &str, limit: usize) -> Result<Vec<Album>, SourceError>;

    /// Tracks whose name matches `term`.
    async fn search_tracks(&self, term: &str, limit: usize) -> Result<Vec<Track>, SourceError>;
}
