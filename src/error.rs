use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("Dataset unavailable: {0}")]
    DatasetUnavailable(String),

    #[error("Filter task join error: {0}")]
    Join(String),
}
