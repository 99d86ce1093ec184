//! Interchangeable catalog sources and the coordinator that falls back
//! through them.

mod coordinator;
mod file_cache;
mod remote;
mod source;
mod source_error;

pub use coordinator::LookupCoordinator;
pub use file_cache::FileCacheSource;
pub use remote::RemoteSource;
#[cfg(test)]
pub use source::MockCatalogSource;
pub use source::CatalogSource;
pub use source_error::SourceError;
