//! Error types for the CLI

use netintent_common::telemetry::TelemetryError;
use netintent_compiler::ValidationError;

/// CLI Result type
pub type Result<T> = std::result::Result<T, Error>;

/// CLI errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid intent: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("logging error: {0}")]
    Logging(#[from] TelemetryError),

    #[error(transparent)]
    Common(#[from] netintent_common::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation {
            errors: err.errors().to_vec(),
        }
    }
}
