mod api_error;
mod itunes;
mod lyrics;

pub use api_error::ApiError;
pub use itunes::{Entity, ITunesClient, ITunesRecord};
pub use lyrics::{LyricsClient, LYRICS_NOT_FOUND};

/// User agent sent with every outbound request.
pub(crate) const USER_AGENT: &str = concat!("mucat/", env!("CARGO_PKG_VERSION"));
