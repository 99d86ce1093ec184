mod error;
mod server;

pub use error::ApiResponseError;
pub use server::HttpServer;
