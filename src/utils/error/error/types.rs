//! Error types for the shortener

use thiserror::Error;

/// Result type alias for the shortener
pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Main error type for the shortener
#[derive(Error, Debug)]
pub enum ShortenerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend errors (ownership lookups, bulk mutations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller is not allowed to see the resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// The short link existed but has been deleted
    #[error("Gone: {0}")]
    Gone(String),

    /// The deletion queue has no free slot (non-waiting submit only)
    #[error("Deletion queue is full (capacity {0})")]
    QueueFull(usize),

    /// The deletion queue no longer accepts work
    #[error("Deletion queue is closed")]
    QueueClosed,

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
