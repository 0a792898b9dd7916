//! Error types for netintent
//!
//! Errors carry structured context to make failures in generated output easy
//! to trace back to the intent or resource that caused them.

use thiserror::Error;

/// Main error type for netintent operations
#[derive(Debug, Error)]
pub enum Error {
    /// Intent failed structural validation
    #[error("validation error: {message}")]
    Validation {
        /// Summary of what's invalid
        message: String,
        /// Every problem found, in discovery order
        errors: Vec<String>,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being serialized (if known)
        kind: Option<String>,
    },
}

impl Error {
    /// Create a validation error listing every problem found
    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self::Validation {
            message: format!("{} validation error(s): {}", errors.len(), errors.join("; ")),
            errors,
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: None,
        }
    }

    /// Create a serialization error for a specific resource kind
    pub fn serialization_for(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: Some(kind.into()),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
