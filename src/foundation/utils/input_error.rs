use thiserror::Error;

/// Rejected caller input. Never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid {kind} name: {value}")]
    InvalidName { kind: &'static str, value: String },

    #[error("Invalid page {page} with page size {page_size}")]
    InvalidPage { page: usize, page_size: usize },
}
