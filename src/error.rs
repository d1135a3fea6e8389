//! Error types
//!
//! Only startup failures surface as `ServerError`. Per-request problems are turned
//! into HTTP status codes inside the handler and never reach this type.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{value}': {reason}")]
    InvalidAddress { value: String, reason: String },

    #[error("invalid value for header {name}: '{value}'")]
    InvalidHeader { name: &'static str, value: String },

    /// The serving directory is missing or is not a directory.
    #[error("serving directory '{}' is not usable: {source}", path.display())]
    ServingRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The listener could not be bound (port in use, insufficient privilege).
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialize logger: {0}")]
    Logger(#[source] std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
