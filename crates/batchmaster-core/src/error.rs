//! Error types for the batchmaster library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all session, storage and provider
/// operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The plan document could not be fetched; session state is untouched
    #[error("Could not load plan '{plan_id}': {reason}")]
    PlanLoad { plan_id: String, reason: String },
    /// Saved progress could not be read back during hydration
    #[error("Could not load saved progress: {reason}")]
    ProgressLoad { reason: String },
    /// SQLite connection or query errors
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Transport or decoding failure while talking to a plan source
    #[error("Fetch error: {message}")]
    Fetch { message: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// An operation needed hydrated state before hydration finished
    #[error("Session has not finished loading saved progress")]
    NotInitialized,
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating storage errors with optional context.
pub struct StorageErrorBuilder {
    message: String,
}

impl StorageErrorBuilder {
    /// Create a new storage error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> SessionError {
        SessionError::Storage {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SessionError {
        SessionError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl SessionError {
    /// Creates a builder for storage errors.
    pub fn storage(message: impl Into<String>) -> StorageErrorBuilder {
        StorageErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a fetch error from any displayable cause.
    pub fn fetch(message: impl fmt::Display) -> Self {
        Self::Fetch {
            message: message.to_string(),
        }
    }

    /// Wraps a provider failure as a "could not load plan" error.
    pub fn plan_load(plan_id: impl Into<String>, cause: &SessionError) -> Self {
        Self::PlanLoad {
            plan_id: plan_id.into(),
            reason: cause.to_string(),
        }
    }

    /// Message suitable for showing to a person using the app.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::PlanLoad { .. } | SessionError::Fetch { .. } => {
                "Could not load the cooking plan. Please check your connection.".to_string()
            }
            SessionError::ProgressLoad { .. } => {
                "Could not load your cooking progress. Starting fresh.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Extension trait for Result to provide concise error mapping with
/// anyhow-style context.
pub trait ResultExt<T, E> {
    /// Add context to any error type, converting to SessionError.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

/// Specialized extension trait for SQLite-related Results.
pub trait StorageResultExt<T> {
    /// Map storage errors with a message.
    fn storage_context(self, message: &str) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| SessionError::Configuration {
            message: format!("{context}: {e}"),
        })
    }
}

impl<T> StorageResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn storage_context(self, message: &str) -> Result<T> {
        self.map_err(|e| SessionError::storage(message).with_source(e))
    }
}

impl From<reqwest::Error> for SessionError {
    fn from(err: reqwest::Error) -> Self {
        SessionError::fetch(err)
    }
}

/// Result type alias for batchmaster operations
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_load_wraps_cause() {
        let cause = SessionError::fetch("connection refused");
        let err = SessionError::plan_load("P1", &cause);
        let text = err.to_string();
        assert!(text.contains("P1"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_user_message_hides_transport_detail() {
        let err = SessionError::fetch("dns failure on api.example.com");
        assert!(!err.user_message().contains("dns"));
    }

    #[test]
    fn test_invalid_input_builder() {
        let err = SessionError::invalid_input("plan_id").with_reason("must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'plan_id': must not be empty"
        );
    }

    #[test]
    fn test_with_context_prefixes_foreign_errors() {
        let io: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk unplugged"));
        let err = io.with_context("Failed to read plans").unwrap_err();
        assert!(matches!(err, SessionError::Configuration { .. }));
        assert!(err
            .to_string()
            .contains("Failed to read plans: disk unplugged"));
    }
}
