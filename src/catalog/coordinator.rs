//! Ordered fallback across catalog sources, with write-through caching of
//! artist lookups.
//!
//! The coordinator tries its sources in the order they were given and takes
//! the whole answer from the first one that is available. Answers are never
//! merged across sources, so the albums of one artist and their tracks always
//! come from the same place.

use crate::catalog::{CatalogSource, SourceError};
use crate::foundation::cache::{CacheStore, PersistOutcome};
use crate::foundation::models::{Album, Artist, Track};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct LookupCoordinator {
    sources: Vec<Arc<dyn CatalogSource>>,
    cache: Option<CacheStore>,
}

impl LookupCoordinator {
    /// Creates a coordinator over `sources`, highest priority first.
    pub fn new(sources: Vec<Arc<dyn CatalogSource>>) -> Self {
        Self {
            sources,
            cache: None,
        }
    }

    /// Persists successful artist lookups to `store`.
    pub fn with_cache_store(mut self, store: CacheStore) -> Self {
        self.cache = Some(store);
        self
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Looks up the albums of `name`, with their tracks.
    ///
    /// The first source that answers decides the result, including an empty
    /// one. Albums that arrive without tracks get them from that same source,
    /// album by album; an album whose tracks cannot be fetched is kept with an
    /// empty track list. When no source is available the artist comes back
    /// without albums.
    ///
    /// Answers from a non-cache source are handed to the cache store. Answers
    /// replayed from the cache are returned as read and never written back.
    ///
    /// Only [`SourceError::Unavailable`] moves the lookup on to the next
    /// source. Any other error is returned as is.
    ///
    /// # Arguments
    ///
    /// * `name` - The artist name, already normalized by the caller.
    /// * `limit` - The maximum number of albums to ask each source for.
    pub async fn resolve_artist(&self, name: &str, limit: usize) -> Result<Artist, SourceError> {
        let mut artist = Artist::new(name);
        let mut resolved_by: Option<&dyn CatalogSource> = None;

        for source in &self.sources {
            match source.fetch_albums(name, limit).await {
                Ok(albums) => {
                    artist.albums = attach_tracks(source.as_ref(), albums).await?;
                    resolved_by = Some(source.as_ref());
                    break;
                }
                Err(SourceError::Unavailable(reason)) => skip(source.as_ref(), name, &reason),
                Err(e) => return Err(e),
            }
        }

        match resolved_by {
            Some(source) => info!(
                "Resolved {} albums of {} from {}",
                artist.albums.len(),
                name,
                source.name()
            ),
            None => warn!("No source could resolve {}", name),
        }

        self.persist(&artist, resolved_by.is_some_and(|s| s.is_cache()));
        Ok(artist)
    }

    /// Searches albums by title, with their tracks. Results are not cached.
    pub async fn resolve_albums_by_name(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Album>, SourceError> {
        for source in &self.sources {
            match source.search_albums(name, limit).await {
                Ok(albums) => return attach_tracks(source.as_ref(), albums).await,
                Err(SourceError::Unavailable(reason)) => skip(source.as_ref(), name, &reason),
                Err(e) => return Err(e),
            }
        }
        warn!("No source could search albums for {}", name);
        Ok(Vec::new())
    }

    /// Searches tracks by name. Results are not cached.
    pub async fn resolve_tracks_by_name(
        &self,
        name: &str,
        limit: usize,
    ) -> Result<Vec<Track>, SourceError> {
        for source in &self.sources {
            match source.search_tracks(name, limit).await {
                Ok(tracks) => return Ok(tracks),
                Err(SourceError::Unavailable(reason)) => skip(source.as_ref(), name, &reason),
                Err(e) => return Err(e),
            }
        }
        warn!("No source could search tracks for {}", name);
        Ok(Vec::new())
    }

    pub async fn resolve_tracks_by_album_id(&self, album_id: u64) -> Result<Vec<Track>, SourceError> {
        for source in &self.sources {
            match source.fetch_tracks(album_id).await {
                Ok(tracks) => return Ok(tracks),
                Err(SourceError::Unavailable(reason)) => {
                    skip(source.as_ref(), &album_id.to_string(), &reason)
                }
                Err(e) => return Err(e),
            }
        }
        warn!("No source could fetch tracks of album {}", album_id);
        Ok(Vec::new())
    }

    /// Hands `artist` to the cache store unless it was `replayed` from a cache
    /// record. Failures are logged, never returned.
    fn persist(&self, artist: &Artist, replayed: bool) {
        let Some(store) = &self.cache else {
            return;
        };
        if replayed {
            debug!("{} came from the cache, leaving its record as is", artist.name);
            return;
        }

        match store.persist(artist) {
            Ok(PersistOutcome::Written(path)) => info!(
                "Cached {} {} albums at {}",
                artist.albums.len(),
                artist.name,
                path.display()
            ),
            Ok(PersistOutcome::SkippedEmpty) => debug!("Nothing to cache for {}", artist.name),
            Ok(PersistOutcome::SkippedPartial) => {
                debug!("Not caching {}: some albums have no tracks", artist.name)
            }
            Err(e) => warn!("Failed to cache {}: {}", artist.name, e),
        }
    }
}

/// Fills in the tracks of each album from `source`, one album at a time.
/// Albums that already carry tracks are left as the source returned them.
async fn attach_tracks(
    source: &dyn CatalogSource,
    mut albums: Vec<Album>,
) -> Result<Vec<Album>, SourceError> {
    for album in albums.iter_mut().filter(|album| !album.has_tracks()) {
        match source.fetch_tracks(album.id).await {
            Ok(tracks) => album.tracks = tracks,
            Err(SourceError::Unavailable(reason)) => warn!(
                "{} could not fetch tracks of {}: {}",
                source.name(),
                album.title,
                reason
            ),
            Err(e) => return Err(e),
        }
    }
    Ok(albums)
}

fn skip(source: &dyn CatalogSource, query: &str, reason: &str) {
    debug!("{} unavailable for {}: {}", source.name(), query, reason);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{FileCacheSource, MockCatalogSource};
    use crate::foundation::models::fixtures::album;
    use tempfile::tempdir;

    fn shared<S: CatalogSource + 'static>(source: S) -> Arc<dyn CatalogSource> {
        Arc::new(source)
    }

    fn mock_source(name: &'static str) -> MockCatalogSource {
        let mut source = MockCatalogSource::new();
        source.expect_name().return_const(name);
        source.expect_is_cache().return_const(false);
        source
    }

    fn down() -> SourceError {
        SourceError::Unavailable("down".to_string())
    }

    fn bare_albums() -> Vec<Album> {
        vec![Album::new(1, "Continuum", ""), Album::new(2, "Heavier Things", "")]
    }

    fn tracks_for(album_id: u64) -> Vec<Track> {
        let mut track = Track::new(&format!("Track of {album_id}"), 1, 1, 180_000);
        track.album_id = Some(album_id);
        vec![track]
    }

    fn unavailable_source(name: &'static str) -> MockCatalogSource {
        let mut source = mock_source(name);
        source
            .expect_fetch_albums()
            .times(1)
            .returning(|_, _| Err(down()));
        source.expect_fetch_tracks().never();
        source
    }

    fn serving_source(name: &'static str, albums: Vec<Album>) -> MockCatalogSource {
        let mut source = mock_source(name);
        source
            .expect_fetch_albums()
            .times(1)
            .returning(move |_, _| Ok(albums.clone()));
        source
            .expect_fetch_tracks()
            .returning(|id| Ok(tracks_for(id)));
        source
    }

    #[tokio::test]
    async fn test_falls_back_to_next_source() {
        let first = unavailable_source("first");
        let second = serving_source("second", bare_albums());
        let coordinator = LookupCoordinator::new(vec![shared(first), shared(second)]);

        let artist = coordinator.resolve_artist("john mayer", 2).await.unwrap();

        assert_eq!(artist.name, "john mayer");
        let ids: Vec<u64> = artist.albums.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(artist.albums[1].tracks, tracks_for(2));
    }

    #[tokio::test]
    async fn test_all_sources_exhausted_gives_empty_artist() {
        let coordinator = LookupCoordinator::new(vec![
            shared(unavailable_source("first")),
            shared(unavailable_source("second")),
        ]);

        let artist = coordinator.resolve_artist("nobody", 3).await.unwrap();

        assert_eq!(artist.name, "nobody");
        assert!(artist.albums.is_empty());
    }

    #[tokio::test]
    async fn test_no_sources_gives_empty_results() {
        let coordinator = LookupCoordinator::new(Vec::new());

        assert!(coordinator.resolve_artist("adele", 3).await.unwrap().albums.is_empty());
        assert!(coordinator.resolve_tracks_by_album_id(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_result_is_authoritative() {
        let mut first = mock_source("first");
        first
            .expect_fetch_albums()
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let mut second = mock_source("second");
        second.expect_fetch_albums().never();

        let coordinator = LookupCoordinator::new(vec![shared(first), shared(second)]);
        let artist = coordinator.resolve_artist("obscure band", 3).await.unwrap();

        assert!(artist.albums.is_empty());
    }

    #[tokio::test]
    async fn test_tracks_come_from_the_winning_source() {
        let mut first = mock_source("first");
        first
            .expect_fetch_albums()
            .times(1)
            .returning(|_, _| Ok(vec![Album::new(7, "21", "")]));
        first
            .expect_fetch_tracks()
            .withf(|id: &u64| *id == 7)
            .times(1)
            .returning(|id| Ok(tracks_for(id)));
        let mut second = mock_source("second");
        second.expect_fetch_albums().never();
        second.expect_fetch_tracks().never();

        let coordinator = LookupCoordinator::new(vec![shared(first), shared(second)]);
        let artist = coordinator.resolve_artist("adele", 1).await.unwrap();

        assert_eq!(artist.albums[0].tracks, tracks_for(7));
    }

    #[tokio::test]
    async fn test_failed_track_fetch_keeps_album_without_tracks() {
        let temp_dir = tempdir().unwrap();
        let store = CacheStore::new(temp_dir.path());

        let mut source = mock_source("remote");
        source
            .expect_fetch_albums()
            .returning(|_, _| Ok(bare_albums()));
        source
            .expect_fetch_tracks()
            .returning(|id| if id == 1 { Ok(tracks_for(1)) } else { Err(down()) });

        let coordinator =
            LookupCoordinator::new(vec![shared(source)]).with_cache_store(store.clone());
        let artist = coordinator.resolve_artist("john mayer", 2).await.unwrap();

        assert_eq!(artist.albums.len(), 2);
        assert!(artist.albums[0].has_tracks());
        assert!(!artist.albums[1].has_tracks());
        assert!(!store.record_path("john mayer", 2).exists());
    }

    #[tokio::test]
    async fn test_protocol_error_propagates() {
        let mut first = mock_source("first");
        first
            .expect_fetch_albums()
            .returning(|_, _| Err(SourceError::Protocol("bad parent".to_string())));
        let mut second = mock_source("second");
        second.expect_fetch_albums().never();

        let coordinator = LookupCoordinator::new(vec![shared(first), shared(second)]);
        let result = coordinator.resolve_artist("adele", 3).await;

        assert_eq!(result, Err(SourceError::Protocol("bad parent".to_string())));
    }

    #[tokio::test]
    async fn test_protocol_error_while_fetching_tracks_propagates() {
        let mut source = mock_source("remote");
        source
            .expect_fetch_albums()
            .returning(|_, _| Ok(bare_albums()));
        source
            .expect_fetch_tracks()
            .times(1)
            .returning(|_| Err(SourceError::Protocol("wrong collection".to_string())));

        let coordinator = LookupCoordinator::new(vec![shared(source)]);
        assert!(coordinator.resolve_artist("john mayer", 2).await.is_err());
    }

    #[tokio::test]
    async fn test_warm_cache_skips_remote() {
        let temp_dir = tempdir().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let cache = FileCacheSource::new(store.clone());
        // Both expectations are checked when the mock drops: one album list
        // and one track list per album, across both lookups.
        let mut remote = mock_source("remote");
        remote
            .expect_fetch_albums()
            .times(1)
            .returning(|_, _| Ok(bare_albums()));
        remote
            .expect_fetch_tracks()
            .times(2)
            .returning(|id| Ok(tracks_for(id)));

        let coordinator = LookupCoordinator::new(vec![shared(cache), shared(remote)])
            .with_cache_store(store.clone());

        let cold = coordinator.resolve_artist("john mayer", 2).await.unwrap();
        assert!(store.record_path("john mayer", 2).exists());

        let warm = coordinator.resolve_artist("john mayer", 2).await.unwrap();
        assert_eq!(warm, cold);
    }

    #[tokio::test]
    async fn test_warm_lookup_keeps_tracks_of_its_own_record() {
        let temp_dir = tempdir().unwrap();
        let store = CacheStore::new(temp_dir.path());
        store
            .persist(&Artist::with_albums("adele", vec![album(25, "25", &["Hello"])]))
            .unwrap();
        let two_albums = Artist::with_albums(
            "adele",
            vec![
                album(21, "21", &["Rolling in the Deep"]),
                album(25, "25", &["Hello", "Send My Love", "Water Under the Bridge"]),
            ],
        );
        store.persist(&two_albums).unwrap();
        let mut remote = mock_source("remote");
        remote.expect_fetch_albums().never();
        remote.expect_fetch_tracks().never();

        let coordinator = LookupCoordinator::new(vec![
            shared(FileCacheSource::new(store.clone())),
            shared(remote),
        ])
        .with_cache_store(store.clone());
        let artist = coordinator.resolve_artist("adele", 2).await.unwrap();

        assert_eq!(artist, two_albums);
        assert_eq!(store.load("adele", 2).unwrap(), two_albums);
        assert_eq!(store.load("adele", 1).unwrap().albums[0].tracks.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_answer_is_not_written_back() {
        let temp_dir = tempdir().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let artist = Artist::with_albums("adele", vec![album(25, "25", &["Hello"])]);
        let compact = serde_json::to_string(&artist).unwrap();
        std::fs::write(store.record_path("adele", 1), &compact).unwrap();

        let coordinator = LookupCoordinator::new(vec![shared(FileCacheSource::new(store.clone()))])
            .with_cache_store(store.clone());
        let resolved = coordinator.resolve_artist("adele", 1).await.unwrap();

        assert_eq!(resolved, artist);
        assert_eq!(
            std::fs::read_to_string(store.record_path("adele", 1)).unwrap(),
            compact
        );
    }

    #[tokio::test]
    async fn test_cache_written_under_returned_album_count() {
        let temp_dir = tempdir().unwrap();
        let store = CacheStore::new(temp_dir.path());
        let remote = serving_source("remote", vec![album(3, "25", &["Hello"])]);

        let coordinator =
            LookupCoordinator::new(vec![shared(remote)]).with_cache_store(store.clone());
        coordinator.resolve_artist("adele", 10).await.unwrap();

        assert!(store.record_path("adele", 1).exists());
        assert!(!store.record_path("adele", 10).exists());
    }

    #[tokio::test]
    async fn test_cache_write_failure_is_swallowed() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file in the way").unwrap();
        let remote = serving_source("remote", bare_albums());

        let coordinator =
            LookupCoordinator::new(vec![shared(remote)]).with_cache_store(CacheStore::new(&blocker));
        let artist = coordinator.resolve_artist("john mayer", 2).await.unwrap();

        assert_eq!(artist.albums.len(), 2);
    }

    #[tokio::test]
    async fn test_resolve_albums_by_name_falls_back_without_caching() {
        let temp_dir = tempdir().unwrap();
        let store = CacheStore::new(temp_dir.path().join("appcache"));
        let cache = FileCacheSource::new(store.clone());
        let mut remote = mock_source("remote");
        remote
            .expect_search_albums()
            .withf(|term: &str, limit: &usize| term == "continuum" && *limit == 2)
            .times(1)
            .returning(|_, _| Ok(bare_albums()));
        remote
            .expect_fetch_tracks()
            .times(2)
            .returning(|id| Ok(tracks_for(id)));

        let coordinator = LookupCoordinator::new(vec![shared(cache), shared(remote)])
            .with_cache_store(store.clone());
        let albums = coordinator.resolve_albums_by_name("continuum", 2).await.unwrap();

        assert_eq!(albums.len(), 2);
        assert!(albums.iter().all(Album::has_tracks));
        assert!(!store.dir().exists());
    }

    #[tokio::test]
    async fn test_resolve_tracks_by_name() {
        let mut first = mock_source("first");
        first.expect_search_tracks().returning(|_, _| Err(down()));
        let mut second = mock_source("second");
        second
            .expect_search_tracks()
            .times(1)
            .returning(|_, _| Ok(tracks_for(5)));

        let coordinator = LookupCoordinator::new(vec![shared(first), shared(second)]);
        let tracks = coordinator.resolve_tracks_by_name("gravity", 3).await.unwrap();

        assert_eq!(tracks, tracks_for(5));
    }

    #[tokio::test]
    async fn test_resolve_tracks_by_album_id_prefers_cache() {
        let temp_dir = tempdir().unwrap();
        let store = CacheStore::new(temp_dir.path());
        store
            .persist(&Artist::with_albums("adele", vec![album(25, "25", &["Hello"])]))
            .unwrap();
        let mut remote = mock_source("remote");
        remote.expect_fetch_tracks().never();

        let coordinator = LookupCoordinator::new(vec![
            shared(FileCacheSource::new(store)),
            shared(remote),
        ]);
        let tracks = coordinator.resolve_tracks_by_album_id(25).await.unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "Hello");
    }

    #[tokio::test]
    async fn test_resolve_tracks_by_album_id_exhausted() {
        let mut only = mock_source("only");
        only.expect_fetch_tracks().times(1).returning(|_| Err(down()));

        let coordinator = LookupCoordinator::new(vec![shared(only)]);
        assert!(coordinator.resolve_tracks_by_album_id(1).await.unwrap().is_empty());
    }
}
