mod album;
mod artist;
#[cfg(test)]
pub(crate) mod fixtures;
mod track;

pub use album::Album;
pub use artist::Artist;
pub use track::{format_millis, Track};
