//! File-backed cache of artist lookups.
//!
//! Each record is one pretty-printed JSON document holding a complete
//! artist, its albums and their tracks. Records are keyed by the artist name
//! and the number of albums the lookup returned, so
//! `<dir>/john-mayer-3.json` holds a three-album snapshot of John Mayer.

use crate::foundation::cache::CacheError;
use crate::foundation::models::{Album, Artist};
use crate::foundation::utils::cache_slug;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const RECORD_EXTENSION: &str = "json";

/// What [`CacheStore::persist`] did with an artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Written(PathBuf),
    SkippedEmpty,
    SkippedPartial,
}

/// Summary of one record on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    pub path: PathBuf,
    pub key: String,
    pub artist_name: String,
    pub album_count: usize,
    pub track_count: usize,
}

/// Owner of the on-disk cache records. Nothing else writes to `dir`.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `artist_name` holding `album_count` albums.
    ///
    /// # Examples
    ///
    /// ```
    /// use mucat::foundation::cache::CacheStore;
    /// use std::path::Path;
    ///
    /// let store = CacheStore::new("./appcache");
    /// assert_eq!(
    ///     store.record_path("John Mayer", 3),
    ///     Path::new("./appcache/john-mayer-3.json")
    /// );
    /// ```
    pub fn record_path(&self, artist_name: &str, album_count: usize) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.{}",
            cache_slug(artist_name),
            album_count,
            RECORD_EXTENSION
        ))
    }

    /// Reads the record for `artist_name` with `album_count` albums.
    ///
    /// A record is only returned whole: unreadable JSON or an album without
    /// tracks fails the read instead of yielding part of the document.
    pub fn load(&self, artist_name: &str, album_count: usize) -> Result<Artist, CacheError> {
        let path = self.record_path(artist_name, album_count);
        let artist = read_record(&path)?;
        debug!(
            "Loaded {} {} albums from {}",
            artist.albums.len(),
            artist.name,
            path.display()
        );
        Ok(artist)
    }

    /// Writes `artist` to its record when the snapshot is complete.
    ///
    /// Nothing is written when there are no albums or when any album has an
    /// empty track list. Otherwise the record keyed by the number of albums
    /// actually present is created, or replaced if it already exists.
    pub fn persist(&self, artist: &Artist) -> Result<PersistOutcome, CacheError> {
        if artist.albums.is_empty() {
            return Ok(PersistOutcome::SkippedEmpty);
        }
        if !artist.is_fully_populated() {
            return Ok(PersistOutcome::SkippedPartial);
        }

        fs::create_dir_all(&self.dir).map_err(CacheError::io(&self.dir))?;

        let path = self.record_path(&artist.name, artist.albums.len());
        let document = encode(artist).map_err(CacheError::Encode)?;
        fs::write(&path, document).map_err(CacheError::io(&path))?;

        Ok(PersistOutcome::Written(path))
    }

    /// Lists every readable record in the cache directory, sorted by file name.
    ///
    /// Documents that fail to parse are skipped with a warning.
    pub fn records(&self) -> Result<Vec<CacheRecord>, CacheError> {
        Ok(self
            .documents()?
            .into_iter()
            .map(|(path, artist)| CacheRecord {
                key: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                artist_name: artist.name.clone(),
                album_count: artist.albums.len(),
                track_count: artist.track_count(),
                path,
            })
            .collect())
    }

    /// Finds an album by id in any record.
    pub fn find_album(&self, album_id: u64) -> Result<Option<Album>, CacheError> {
        Ok(self
            .documents()?
            .into_iter()
            .flat_map(|(_, artist)| artist.albums)
            .find(|album| album.id == album_id))
    }

    fn documents(&self) -> Result<Vec<(PathBuf, Artist)>, CacheError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| CacheError::Io {
                path: self.dir.clone(),
                source: io::Error::from(e),
            })?;
            let path = entry.path();
            if !is_record_file(path) {
                continue;
            }
            match read_record(path) {
                Ok(artist) => documents.push((path.to_path_buf(), artist)),
                Err(e) => warn!("Skipping cache record: {}", e),
            }
        }
        Ok(documents)
    }
}

fn read_record(path: &Path) -> Result<Artist, CacheError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CacheError::NotFound(path.to_path_buf()),
        _ => CacheError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let artist: Artist = serde_json::from_str(&content).map_err(|source| CacheError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    if !artist.is_fully_populated() {
        return Err(CacheError::Incomplete(path.to_path_buf()));
    }
    Ok(artist)
}

fn encode(artist: &Artist) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    artist.serialize(&mut serializer)?;
    Ok(buffer)
}

fn is_record_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORD_EXTENSION))
}
