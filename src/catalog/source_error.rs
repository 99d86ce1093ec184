use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The medium behind the source could not produce data for this request.
    /// The coordinator moves on to the next source.
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The source answered, but in a way that breaks its own contract.
    #[error("protocol violation: {0}")]
    Protocol(String),
}
