//! Error types for the MentorBuddy application.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire MentorBuddy application.
///
/// Every variant is recoverable at the screen level; none of them should
/// terminate the process.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum MentorError {
    /// User input rejected before reaching any backend (bad password, empty field).
    #[error("{0}")]
    Validation(String),

    /// The identity store could not be reached or answered with an error on read.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// A write to the identity store failed.
    #[error("Store write failed: {0}")]
    StoreWrite(String),

    /// Signup attempted with a username that is already taken.
    #[error("User '{0}' already exists")]
    DuplicateUser(String),

    /// The text generation service failed (network, quota, malformed response).
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Persisted chat history could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MentorError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a StoreUnavailable error
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable(message.into())
    }

    /// Creates a StoreWrite error
    pub fn store_write(message: impl Into<String>) -> Self {
        Self::StoreWrite(message.into())
    }

    /// Creates a DuplicateUser error
    pub fn duplicate_user(username: impl Into<String>) -> Self {
        Self::DuplicateUser(username.into())
    }

    /// Creates a Generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Creates a Decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a DuplicateUser error
    pub fn is_duplicate_user(&self) -> bool {
        matches!(self, Self::DuplicateUser(_))
    }

    /// Check if this is a Generation error
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_))
    }

    /// Check if this is a Decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Check if this error came from the identity store (read or write side).
    pub fn is_store(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::StoreWrite(_))
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for MentorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for MentorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for MentorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for MentorError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (used at the binary boundary)
impl From<anyhow::Error> for MentorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, MentorError>`.
pub type Result<T> = std::result::Result<T, MentorError>;
