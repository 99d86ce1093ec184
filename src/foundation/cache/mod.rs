mod cache_error;
mod store;

pub use cache_error::CacheError;
pub use store::*;
