use crate::foundation::models::Track;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An album together with its tracks, in the order the source returned them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: u64,
    pub title: String,
    pub image_url: String,
    #[serde(default)]
    pub artist_id: Option<u64>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Album {
    pub fn new(id: u64, title: &str, image_url: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            image_url: image_url.to_string(),
            artist_id: None,
            artist_name: None,
            release_date: None,
            genre: None,
            tracks: Vec::new(),
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Checks the album against the optional genre and release year filters.
    ///
    /// Genre comparison ignores case. The year matches when the release date
    /// starts with it, which covers the provider's ISO-8601 timestamps.
    pub fn matches(&self, genre: Option<&str>, release_year: Option<&str>) -> bool {
        let genre_ok = genre.map_or(true, |wanted| {
            self.genre
                .as_deref()
                .is_some_and(|g| g.eq_ignore_ascii_case(wanted.trim()))
        });
        let year_ok = release_year.map_or(true, |year| {
            self.release_date
                .as_deref()
                .is_some_and(|date| date.starts_with(year.trim()))
        });
        genre_ok && year_ok
    }
}

impl fmt::Display for Album {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)?;
        if let Some(genre) = &self.genre {
            write!(f, " - {}", genre)?;
        }
        writeln!(f)?;
        writeln!(f, "   {}", self.image_url)?;
        for track in &self.tracks {
            writeln!(f, "{}", track)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album_with_tracks() -> Album {
        let mut album = Album::new(1, "Test Album", "http://example.com/album.jpg");
        album.tracks = vec![
            Track::new("Track 1", 1, 1, 300_000).with_preview_url("http://example.com/track1"),
            Track::new("Track 2", 1, 2, 240_000).with_preview_url("http://example.com/track2"),
        ];
        album
    }

    #[test]
    fn test_to_json() {
        let album = album_with_tracks();
        let value = serde_json::to_value(&album).unwrap();

        assert_eq!(value["id"], 1);
        assert_eq!(value["title"], "Test Album");
        assert_eq!(value["image_url"], "http://example.com/album.jpg");
        assert_eq!(value["tracks"].as_array().unwrap().len(), 2);
        assert_eq!(value["tracks"][0]["name"], "Track 1");
        assert_eq!(value["tracks"][1]["preview_url"], "http://example.com/track2");
    }

    #[test]
    fn test_empty_tracks_to_json() {
        let album = Album::new(1, "Empty Album", "http://example.com/empty_album.jpg");
        let value = serde_json::to_value(&album).unwrap();

        assert!(!album.has_tracks());
        assert_eq!(value["tracks"], serde_json::json!([]));
    }

    #[test]
    fn test_display() {
        let text = album_with_tracks().to_string();

        assert!(text.contains("Test Album"));
        assert!(text.contains("http://example.com/album.jpg"));
        assert!(text.contains("1-1: Track 1 [5:00]"));
        assert!(text.contains("1-2: Track 2 [4:00]"));
    }

    #[test]
    fn test_matches_filters() {
        let mut album = album_with_tracks();
        album.genre = Some("Rock".to_string());
        album.release_date = Some("2006-09-12T07:00:00Z".to_string());

        assert!(album.matches(None, None));
        assert!(album.matches(Some("rock"), None));
        assert!(album.matches(Some("Rock"), Some("2006")));
        assert!(!album.matches(Some("Jazz"), None));
        assert!(!album.matches(None, Some("2010")));

        let bare = Album::new(2, "Bare", "");
        assert!(!bare.matches(Some("Rock"), None));
    }
}
