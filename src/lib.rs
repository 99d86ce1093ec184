pub mod api_client;
pub mod catalog;
pub mod configuration;
pub mod foundation;
pub mod server;
pub mod startup;

pub use catalog::{CatalogSource, LookupCoordinator, SourceError};
pub use configuration::*;
pub use foundation::models::{Album, Artist, Track};
