//! Error types for the engine, catalog and configuration.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid grid dimension: {rows}x{cols} (rows and columns must be positive)")]
    InvalidDimension { rows: usize, cols: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown pattern: {category}/{name}")]
    UnknownPattern { category: String, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Driver task failed: {0}")]
    Driver(#[from] tokio::task::JoinError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
