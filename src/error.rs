//! Error types for message schema conversion

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema conversion errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Both {name} and {previous} normalize to the same schema name: {identifier}")]
    NameCollision {
        name: String,
        previous: String,
        identifier: String,
    },

    #[error("Message has not been parsed: {name} ({identifier})")]
    NotRegistered { name: String, identifier: String },

    /// The normalized name is empty or starts with a digit, so it cannot
    /// satisfy `[a-zA-Z][a-zA-Z0-9]*`. Rejected here rather than emitted as
    /// an unusable schema key.
    #[error("Definition name {name:?} does not normalize to a valid schema name")]
    InvalidName { name: String },

    #[error("Message not found: {0}")]
    MessageNotFound(String),

    #[error("Message defined more than once: {0}")]
    DuplicateMessage(String),

    #[error("Field {message}.{field} references unknown message type {target}")]
    UnknownMessage {
        message: String,
        field: String,
        target: String,
    },

    #[error("Field {message}.{field} has type \"message\" but names no message type")]
    MissingMessageType { message: String, field: String },

    #[error("Unsupported definition file: {0}")]
    UnsupportedFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
