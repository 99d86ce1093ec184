//! Sample artists shared by tests across the crate.

use crate::foundation::models::{Album, Artist, Track};

pub(crate) fn album(id: u64, title: &str, track_names: &[&str]) -> Album {
    let mut album = Album::new(id, title, &format!("http://example.com/{id}.jpg"));
    album.genre = Some("Rock".to_string());
    album.release_date = Some("2006-09-12T07:00:00Z".to_string());
    album.tracks = track_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut track = Track::new(name, 1, i as u32 + 1, 200_000 + i as u64 * 1000);
            track.album_id = Some(id);
            track
        })
        .collect();
    album
}

pub(crate) fn full_artist() -> Artist {
    Artist::with_albums(
        "John Mayer",
        vec![
            album(1, "Continuum", &["Gravity", "Belief"]),
            album(2, "Heavier Things", &["Clarity"]),
        ],
    )
}
