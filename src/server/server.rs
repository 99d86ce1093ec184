use rouille::{Request, Response};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

use crate::api_client::LyricsClient;
use crate::catalog::LookupCoordinator;
use crate::configuration::ServerSettings;
use crate::foundation::models::{Album, Artist, Track};
use crate::foundation::utils::{check_page, fetch_limit, normalize_search_term, paginate, Pagination};
use crate::server::ApiResponseError;

/// JSON API over the lookup coordinator.
///
/// rouille serves each request on its own worker thread; the async lookups
/// are driven to completion on the tokio runtime behind `runtime`.
pub struct HttpServer {
    coordinator: Arc<LookupCoordinator>,
    lyrics: LyricsClient,
    runtime: Handle,
    default_limit: usize,
    pub config: ServerSettings,
}

#[derive(Serialize)]
struct ArtistPageResponse {
    artist: Artist,
    pagination: Pagination,
}

#[derive(Serialize)]
struct AlbumsPageResponse {
    albums: Vec<Album>,
    pagination: Pagination,
}

#[derive(Serialize)]
struct TracksPageResponse {
    tracks: Vec<Track>,
    pagination: Pagination,
}

#[derive(Serialize)]
struct LyricsResponse<'a> {
    artist: &'a str,
    song: &'a str,
    lyrics: String,
}

/// Query string shared by the list routes.
struct ListQuery {
    limit: Option<usize>,
    page: usize,
    page_size: usize,
    genre: Option<String>,
    release_year: Option<String>,
}

impl ListQuery {
    fn from_request(request: &Request, default_page_size: usize) -> Result<Self, ApiResponseError> {
        let page = parse_param(request, "page")?.unwrap_or(1);
        let page_size = parse_param(request, "page_size")?.unwrap_or(default_page_size);
        check_page(page, page_size)?;

        Ok(Self {
            limit: parse_param(request, "limit")?,
            page,
            page_size,
            genre: text_param(request, "genre"),
            release_year: text_param(request, "release_year"),
        })
    }

    fn fetch_limit(&self, default_limit: usize) -> usize {
        fetch_limit(self.page, self.page_size, self.limit.unwrap_or(default_limit))
    }

    fn filter_albums(&self, albums: Vec<Album>) -> Vec<Album> {
        albums
            .into_iter()
            .filter(|album| album.matches(self.genre.as_deref(), self.release_year.as_deref()))
            .collect()
    }
}

impl HttpServer {
    pub fn new(
        coordinator: Arc<LookupCoordinator>,
        lyrics: LyricsClient,
        runtime: Handle,
        default_limit: usize,
        config: ServerSettings,
    ) -> Self {
        Self {
            coordinator,
            lyrics,
            runtime,
            default_limit,
            config,
        }
    }

    pub fn run(self) {
        let addr = format!("{}:{}", self.config.bind_addr, self.config.port);
        info!("Serving on http://{}", addr);
        rouille::start_server(addr, move |request| self.handle_request(request));
    }

    fn handle_request(&self, request: &Request) -> Response {
        info!("{} {}", request.method(), request.url());

        let result = rouille::router!(request,
            (GET) (/artist/{name: String}) => {
                self.get_artist(request, &name)
            },
            (GET) (/albums/{id: u64}/tracks) => {
                self.get_album_tracks(id)
            },
            (GET) (/albums/{name: String}) => {
                self.get_albums(request, &name)
            },
            (GET) (/tracks/{name: String}) => {
                self.get_tracks(request, &name)
            },
            (GET) (/lyrics/{artist: String}/{song: String}) => {
                self.get_lyrics(&artist, &song)
            },
            _ => Ok(Response::empty_404())
        );

        let response = result.unwrap_or_else(ApiResponseError::into_response);
        info!("Response: {} {}", request.method(), response.status_code);
        response
    }

    fn get_artist(&self, request: &Request, raw_name: &str) -> Result<Response, ApiResponseError> {
        let name = normalize_search_term("artist", raw_name)?;
        let query = ListQuery::from_request(request, self.config.page_size)?;

        let artist = self.runtime.block_on(
            self.coordinator
                .resolve_artist(&name, query.fetch_limit(self.default_limit)),
        )?;

        let albums = query.filter_albums(artist.albums);
        let page = paginate(&albums, query.page, query.page_size)?;
        Ok(Response::json(&ArtistPageResponse {
            artist: Artist::with_albums(&artist.name, page.items),
            pagination: page.pagination,
        }))
    }

    fn get_albums(&self, request: &Request, raw_name: &str) -> Result<Response, ApiResponseError> {
        let name = normalize_search_term("album", raw_name)?;
        let query = ListQuery::from_request(request, self.config.page_size)?;

        let albums = self.runtime.block_on(
            self.coordinator
                .resolve_albums_by_name(&name, query.fetch_limit(self.default_limit)),
        )?;

        let albums = query.filter_albums(albums);
        let page = paginate(&albums, query.page, query.page_size)?;
        Ok(Response::json(&AlbumsPageResponse {
            albums: page.items,
            pagination: page.pagination,
        }))
    }

    fn get_tracks(&self, request: &Request, raw_name: &str) -> Result<Response, ApiResponseError> {
        let name = normalize_search_term("track", raw_name)?;
        let query = ListQuery::from_request(request, self.config.page_size)?;

        let tracks = self.runtime.block_on(
            self.coordinator
                .resolve_tracks_by_name(&name, query.fetch_limit(self.default_limit)),
        )?;

        let page = paginate(&tracks, query.page, query.page_size)?;
        Ok(Response::json(&TracksPageResponse {
            tracks: page.items,
            pagination: page.pagination,
        }))
    }

    fn get_album_tracks(&self, album_id: u64) -> Result<Response, ApiResponseError> {
        let tracks = self
            .runtime
            .block_on(self.coordinator.resolve_tracks_by_album_id(album_id))?;
        Ok(Response::json(&tracks))
    }

    fn get_lyrics(&self, artist: &str, song: &str) -> Result<Response, ApiResponseError> {
        let lyrics = self.runtime.block_on(self.lyrics.fetch_lyrics(artist, song))?;
        Ok(Response::json(&LyricsResponse {
            artist,
            song,
            lyrics,
        }))
    }
}

/// Parses an optional query parameter; a value that does not parse is a bad request.
fn parse_param<T: FromStr>(request: &Request, key: &str) -> Result<Option<T>, ApiResponseError> {
    match text_param(request, key) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiResponseError::BadRequest(format!("Invalid {}: {}", key, value))),
        None => Ok(None),
    }
}

fn text_param(request: &Request, key: &str) -> Option<String> {
    request
        .get_param(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
