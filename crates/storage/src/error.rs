//! Error types for the storage layer

use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Invalid Redis connection string")]
    InvalidConnectionString,

    #[error("Could not connect to Redis: connection refused")]
    ConnectionRefused,

    #[error("Could not authenticate with Redis")]
    AuthenticationFailed,

    #[error("Unsupported MongoDB version {found} (requires {floor} or newer)")]
    UnsupportedServerVersion { found: String, floor: String },

    #[error("Replacement document has no _id")]
    MissingId,

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Invalid diff: {0}")]
    InvalidDiff(String),

    #[error(transparent)]
    Core(#[from] virion_core::CoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BSON serialization error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    #[error("Malformed BLAST response: {0}")]
    MalformedBlastResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl StorageError {
    /// True when the error is a server-side duplicate-key write error.
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            StorageError::Mongo(error) => is_duplicate_key_error(error),
            _ => false,
        }
    }
}

/// True when `error` carries the duplicate-key write error code (11000).
pub(crate) fn is_duplicate_key_error(error: &mongodb::error::Error) -> bool {
    if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = error.kind.as_ref() {
        return write_error.code == 11000;
    }

    false
}

pub type Result<T> = std::result::Result<T, StorageError>;
