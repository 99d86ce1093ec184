//! Catalog source backed by the iTunes Search API.

use crate::api_client::{ApiError, Entity, ITunesClient, ITunesRecord};
use crate::catalog::{CatalogSource, SourceError};
use crate::foundation::models::{Album, Track};
use async_trait::async_trait;
use tracing::{debug, info};

pub struct RemoteSource {
    client: ITunesClient,
}

impl RemoteSource {
    pub fn new(client: ITunesClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CatalogSource for RemoteSource {
    fn name(&self) -> &'static str {
        "itunes"
    }

    fn is_cache(&self) -> bool {
        false
    }

    async fn fetch_albums(&self, artist_name: &str, limit: usize) -> Result<Vec<Album>, SourceError> {
        let records = self
            .client
            .search(artist_name, Entity::Album, limit)
            .await
            .map_err(unavailable)?;

        let albums = map_records(records.iter().filter(is_collection), map_album);
        info!("Loaded {} {} albums from iTunes", albums.len(), artist_name);
        Ok(albums)
    }

    async fn fetch_tracks(&self, album_id: u64) -> Result<Vec<Track>, SourceError> {
        let records = self
            .client
            .lookup(album_id, Entity::Song)
            .await
            .map_err(unavailable)?;

        let Some((parent, children)) = records.split_first() else {
            return Ok(Vec::new());
        };
        if parent.collection_id != Some(album_id) {
            return Err(SourceError::Protocol(format!(
                "lookup of album {} returned collection {:?} first",
                album_id, parent.collection_id
            )));
        }

        let tracks = map_records(children.iter().filter(is_song), map_track);
        info!(
            "Loaded {} tracks of {} from iTunes",
            tracks.len(),
            parent.collection_name.as_deref().unwrap_or("unknown album")
        );
        Ok(tracks)
    }

    async fn search_albums(&self, term: &str, limit: usize) -> Result<Vec<Album>, SourceError> {
        let records = self
            .client
            .search(term, Entity::Album, limit)
            .await
            .map_err(unavailable)?;

        let albums = map_records(records.iter().filter(is_collection), map_album);
        info!("Loaded {} albums matching {} from iTunes", albums.len(), term);
        Ok(albums)
    }

    async fn search_tracks(&self, term: &str, limit: usize) -> Result<Vec<Track>, SourceError> {
        let records = self
            .client
            .search(term, Entity::Song, limit)
            .await
            .map_err(unavailable)?;

        let tracks = map_records(records.iter().filter(is_song), map_track);
        info!("Loaded {} tracks matching {} from iTunes", tracks.len(), term);
        Ok(tracks)
    }
}

fn unavailable(error: ApiError) -> SourceError {
    SourceError::Unavailable(error.to_string())
}

fn map_records<'a, T>(
    records: impl IntoIterator<Item = &'a ITunesRecord>,
    map: fn(&ITunesRecord) -> Option<T>,
) -> Vec<T> {
    records
        .into_iter()
        .filter_map(|record| {
            let mapped = map(record);
            if mapped.is_none() {
                debug!("Skipping incomplete iTunes record: {:?}", record);
            }
            mapped
        })
        .collect()
}

fn is_collection(record: &&ITunesRecord) -> bool {
    record.wrapper_type.as_deref() == Some("collection")
}

/// Lookups can return music videos and other kinds next to songs.
fn is_song(record: &&ITunesRecord) -> bool {
    record.wrapper_type.as_deref() == Some("track") && record.kind.as_deref() == Some("song")
}

/// Maps an iTunes collection to an album without tracks.
fn map_album(record: &ITunesRecord) -> Option<Album> {
    let mut album = Album::new(
        record.collection_id?,
        record.collection_name.as_deref()?,
        record.artwork_url100.as_deref().unwrap_or_default(),
    );
    album.artist_id = record.artist_id;
    album.artist_name = record.artist_name.clone();
    album.release_date = record.release_date.clone();
    album.genre = record.primary_genre_name.clone();
    Some(album)
}

/// Maps an iTunes track. Missing positions default to the first disc and track.
fn map_track(record: &ITunesRecord) -> Option<Track> {
    let mut track = Track::new(
        record.track_name.as_deref()?,
        record.disc_number.unwrap_or(1),
        record.track_number.unwrap_or(1),
        record.track_time_millis.unwrap_or(0),
    );
    track.id = record.track_id;
    track.preview_url = record.preview_url.clone();
    track.artist_id = record.artist_id;
    track.artist_name = record.artist_name.clone();
    track.album_id = record.collection_id;
    track.album_name = record.collection_name.clone();
    Some(track)
}
