use crate::foundation::models::Album;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An artist and the albums found by the last lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    #[serde(default)]
    pub albums: Vec<Album>,
}

impl Artist {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            albums: Vec::new(),
        }
    }

    pub fn with_albums(name: &str, albums: Vec<Album>) -> Self {
        Self {
            name: name.to_string(),
            albums,
        }
    }

    /// True when there is at least one album and every album carries tracks.
    pub fn is_fully_populated(&self) -> bool {
        !self.albums.is_empty() && self.albums.iter().all(Album::has_tracks)
    }

    pub fn track_count(&self) -> usize {
        self.albums.iter().map(|a| a.tracks.len()).sum()
    }
}

impl fmt::Display for Artist {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} - {} albums", self.name, self.albums.len())?;
        for album in &self.albums {
            write!(f, "{}", album)?;
        }
        Ok(())
    }
}
