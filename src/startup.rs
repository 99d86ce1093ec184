/// # Wiring and Command Handlers
///
/// Builds the lookup coordinator from the settings and runs the work behind
/// each command line entry point.
///
/// # Steps:
/// 1. Loads the configuration
/// 2. Builds the catalog sources in their configured priority order
/// 3. Runs a single lookup, the HTTP server, or a cache listing
///
use crate::api_client::{ITunesClient, LyricsClient};
use crate::catalog::{CatalogSource, FileCacheSource, LookupCoordinator, RemoteSource};
use crate::configuration::{self, ConfigFolder, Settings, SourceKind};
use crate::foundation::cache::CacheStore;
use crate::foundation::models::Artist;
use crate::foundation::utils::{check_page, fetch_limit, normalize_search_term, paginate, InputError};
use crate::server::HttpServer;
use anyhow::{bail, Context};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// A single query run from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Artist {
        name: String,
        limit: Option<usize>,
        page: Option<usize>,
        page_size: Option<usize>,
    },
    Albums {
        name: String,
        limit: Option<usize>,
    },
    Tracks {
        name: String,
        limit: Option<usize>,
    },
    AlbumTracks {
        album_id: u64,
    },
    Lyrics {
        artist: String,
        song: String,
    },
}

/// Installs the global tracing subscriber. Logs go to stderr so that JSON
/// output on stdout stays clean.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mucat=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

pub fn load_settings(cfg_folder: &ConfigFolder) -> anyhow::Result<Settings> {
    configuration::get_configuration(&cfg_folder.config_file).with_context(|| {
        format!(
            "Unable to parse configuration file {}",
            cfg_folder.config_file.display()
        )
    })
}

/// Builds the coordinator with its sources in the configured order.
///
/// With the cache disabled, cache sources are left out and nothing is
/// persisted. A configuration that leaves no source at all is rejected.
pub fn build_coordinator(settings: &Settings) -> anyhow::Result<LookupCoordinator> {
    let cache_enabled = settings.cache_settings.enabled;
    let store = CacheStore::new(&settings.cache_settings.cache_dir);

    let mut sources: Vec<Arc<dyn CatalogSource>> = Vec::new();
    for kind in &settings.catalog_settings.sources {
        match kind {
            SourceKind::Cache if !cache_enabled => {
                warn!("Cache is disabled, leaving out the cache source")
            }
            SourceKind::Cache => sources.push(Arc::new(FileCacheSource::new(store.clone()))),
            SourceKind::Itunes => {
                let client = ITunesClient::new(&settings.catalog_settings.base_url)?;
                sources.push(Arc::new(RemoteSource::new(client)));
            }
        }
    }

    if sources.is_empty() {
        bail!("catalog_settings.sources must name at least one usable source");
    }

    let coordinator = LookupCoordinator::new(sources);
    info!("Catalog sources: {}", coordinator.source_names().join(" -> "));

    Ok(if cache_enabled {
        coordinator.with_cache_store(store)
    } else {
        coordinator
    })
}

/// Runs one lookup and prints the result, as text or as pretty JSON.
pub async fn run_lookup(cfg_folder: ConfigFolder, lookup: Lookup, json: bool) -> anyhow::Result<()> {
    let settings = load_settings(&cfg_folder)?;
    let default_limit = settings.catalog_settings.default_limit;

    let coordinator = build_coordinator(&settings)?;

    match lookup {
        Lookup::Artist {
            name,
            limit,
            page,
            page_size,
        } => {
            let name = normalize_search_term("artist", &name)?;
            let page_size = page_size.unwrap_or(settings.server_settings.page_size);
            let fetch = artist_fetch_limit(page, page_size, limit.unwrap_or(default_limit))?;

            let artist = with_spinner(
                format!("Looking up {}...", name),
                coordinator.resolve_artist(&name, fetch),
            )
            .await?;

            let artist = match page {
                Some(page) => {
                    let window = paginate(&artist.albums, page, page_size)?;
                    if !json {
                        println!(
                            "\x1b[34mPage {} of {}\x1b[0m",
                            window.pagination.page, window.pagination.total_pages
                        );
                    }
                    Artist::with_albums(&artist.name, window.items)
                }
                None => artist,
            };

            if artist.albums.is_empty() && !json {
                println!("\x1b[33mNo albums found for {}\x1b[0m", artist.name);
                return Ok(());
            }
            print_result(&artist, json, |a| a.to_string())
        }
        Lookup::Albums { name, limit } => {
            let name = normalize_search_term("album", &name)?;
            let albums = with_spinner(
                format!("Searching albums for {}...", name),
                coordinator.resolve_albums_by_name(&name, limit.unwrap_or(default_limit)),
            )
            .await?;
            print_result(&albums, json, |albums| {
                albums.iter().map(|a| a.to_string()).collect()
            })
        }
        Lookup::Tracks { name, limit } => {
            let name = normalize_search_term("track", &name)?;
            let tracks = with_spinner(
                format!("Searching tracks for {}...", name),
                coordinator.resolve_tracks_by_name(&name, limit.unwrap_or(default_limit)),
            )
            .await?;
            print_result(&tracks, json, |tracks| {
                tracks.iter().map(|t| format!("{}\n", t)).collect()
            })
        }
        Lookup::AlbumTracks { album_id } => {
            let tracks = with_spinner(
                format!("Fetching tracks of album {}...", album_id),
                coordinator.resolve_tracks_by_album_id(album_id),
            )
            .await?;
            print_result(&tracks, json, |tracks| {
                tracks.iter().map(|t| format!("{}\n", t)).collect()
            })
        }
        Lookup::Lyrics { artist, song } => {
            let client = LyricsClient::new(&settings.lyrics_settings.base_url)?;
            let lyrics = with_spinner(
                format!("Fetching lyrics of {} by {}...", song, artist),
                client.fetch_lyrics(&artist, &song),
            )
            .await?;
            if json {
                let body = serde_json::json!({ "artist": artist, "song": song, "lyrics": lyrics });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("\x1b[1m\x1b[34m{} - {}\x1b[0m\n", artist, song);
                println!("{}", lyrics);
            }
            Ok(())
        }
    }
}

/// Starts the HTTP API and blocks until the server stops.
pub async fn serve(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    let settings = load_settings(&cfg_folder)?;
    let coordinator = Arc::new(build_coordinator(&settings)?);
    let lyrics = LyricsClient::new(&settings.lyrics_settings.base_url)?;

    let server = HttpServer::new(
        coordinator,
        lyrics,
        tokio::runtime::Handle::current(),
        settings.catalog_settings.default_limit,
        settings.server_settings.clone(),
    );

    println!(
        "\x1b[1m\x1b[34mListening on http://{}:{}\x1b[0m",
        settings.server_settings.bind_addr, settings.server_settings.port
    );
    tokio::task::spawn_blocking(move || server.run()).await?;
    Ok(())
}

/// Prints every record in the cache directory.
pub fn list_cache(cfg_folder: ConfigFolder) -> anyhow::Result<()> {
    let settings = load_settings(&cfg_folder)?;
    let store = CacheStore::new(&settings.cache_settings.cache_dir);
    let records = store.records()?;

    if records.is_empty() {
        println!(
            "\x1b[33mNo cache records in {}\x1b[0m",
            store.dir().display()
        );
        return Ok(());
    }

    println!("\x1b[1m\x1b[34mCache records in {}:\x1b[0m", store.dir().display());
    for record in records {
        println!(
            "  \x1b[32m{}\x1b[0m - {} ({} albums, {} tracks)",
            record.key, record.artist_name, record.album_count, record.track_count
        );
    }
    Ok(())
}

/// Albums to request for an artist lookup, checking the page before any
/// source is queried.
fn artist_fetch_limit(
    page: Option<usize>,
    page_size: usize,
    limit: usize,
) -> Result<usize, InputError> {
    match page {
        Some(page) => {
            check_page(page, page_size)?;
            Ok(fetch_limit(page, page_size, limit))
        }
        None => Ok(limit),
    }
}

fn print_result<T: Serialize>(
    value: &T,
    json: bool,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", render(value));
    }
    Ok(())
}

async fn with_spinner<F: Future>(message: String, work: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = work.await;
    spinner.finish_and_clear();
    output
}
