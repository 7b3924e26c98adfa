//! Custom error types for the agenda application
//!
//! Structured errors built with thiserror. The binary edge converts them into
//! `anyhow::Error`; everything below it returns these types.

use thiserror::Error;

/// Main error type for the agenda application
#[derive(Error, Debug)]
pub enum AgendaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Activity directory errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schedule store errors
    #[error("Schedule store error: {0}")]
    Store(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not determine the configuration directory")]
    NoConfigDirectory,

    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration file: {0}")]
    SaveFailed(String),

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Activity directory errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to reach the activity directory: {0}")]
    ConnectionFailed(String),

    #[error("Activity directory returned {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Invalid activity directory response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Per-field validation failures of a schedule entry draft
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required")]
    Required,

    #[error("Invalid time, expected HH:MM")]
    InvalidTime(String),

    #[error("Must be a positive integer")]
    NotPositive(i64),
}

/// Result type alias for the agenda application
pub type Result<T> = std::result::Result<T, AgendaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AgendaError::Config(ConfigError::NoConfigDirectory);
        assert!(err.to_string().contains("configuration directory"));

        let err = AgendaError::Api(ApiError::RequestFailed {
            status: 503,
            body: "down".to_string(),
        });
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let agenda_err: AgendaError = io_err.into();
        assert!(matches!(agenda_err, AgendaError::Io(_)));

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let agenda_err: AgendaError = json_err.into();
        assert!(matches!(agenda_err, AgendaError::Json(_)));
    }

    #[test]
    fn test_validation_messages_are_inline_friendly() {
        assert_eq!(ValidationError::Required.to_string(), "Required");
        assert_eq!(
            ValidationError::InvalidTime("25:00".to_string()).to_string(),
            "Invalid time, expected HH:MM"
        );
        assert_eq!(
            ValidationError::NotPositive(0).to_string(),
            "Must be a positive integer"
        );
    }
}
