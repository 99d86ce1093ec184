use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Reqwest error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error ({status}) from {url}")]
    Status { status: u16, url: String },
}
