//! Shared error type for storage and configuration

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the local plumbing: database, files, config, documents
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config could not be read, parsed or written
    #[error("Configuration error: {0}")]
    Config(String),

    /// Stored JSON document could not be encoded
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),
}
