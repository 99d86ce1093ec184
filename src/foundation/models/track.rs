use serde::{Deserialize, Serialize};
use std::fmt;

/// A single song on an album, identified by its disc and position on that disc.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    pub disc: u32,
    pub number: u32,
    pub time_millis: u64,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub artist_id: Option<u64>,
    #[serde(default)]
    pub artist_name: Option<String>,
    #[serde(default)]
    pub album_id: Option<u64>,
    #[serde(default)]
    pub album_name: Option<String>,
}

impl Track {
    /// Creates a track without ownership links.
    ///
    /// Disc and track numbers start at 1; a zero is raised to 1.
    pub fn new(name: &str, disc: u32, number: u32, time_millis: u64) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            disc: disc.max(1),
            number: number.max(1),
            time_millis,
            preview_url: None,
            artist_id: None,
            artist_name: None,
            album_id: None,
            album_name: None,
        }
    }

    pub fn with_preview_url(mut self, url: &str) -> Self {
        self.preview_url = Some(url.to_string());
        self
    }

    pub fn duration(&self) -> String {
        format_millis(self.time_millis)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "   {}-{}: {} [{}]",
            self.disc,
            self.number,
            self.name,
            self.duration()
        )
    }
}

/// Formats a duration in milliseconds as `m:ss`.
///
/// ```
/// use mucat::foundation::models::format_millis;
///
/// assert_eq!(format_millis(245_000), "4:05");
/// ```
pub fn format_millis(millis: u64) -> String {
    let secs = millis / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
