//! Error types for zmcos operations.
//!
//! Every failure the tool can hit falls into one of a handful of classes:
//! reading the local configuration, reaching and authenticating against the
//! directory, running one of the searches, or writing the report. None of
//! them are retried.

use thiserror::Error;

/// Main error type for zmcos operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Local configuration could not be read, parsed or validated
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Dial, StartTLS upgrade or bind failed
    #[error("Directory connection error: {0}")]
    ConnectionError(String),

    /// A directory search failed
    #[error("Directory search failed: {query}: {message}")]
    SearchError {
        /// Which search failed
        query: String,
        /// Error message
        message: String,
    },

    /// Operation timed out
    #[error("Timeout waiting for directory: {0}")]
    Timeout(String),

    /// Report could not be written
    #[error("Output error: {0}")]
    OutputError(String),
}

/// Specialized result type for zmcos operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ConnectionError(_) => "CONNECTION_ERROR",
            Self::SearchError { .. } => "SEARCH_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::OutputError(_) => "OUTPUT_ERROR",
        }
    }

    /// Builds a [`Error::SearchError`] for the named query.
    #[must_use]
    pub fn search(query: impl Into<String>, message: impl ToString) -> Self {
        Self::SearchError {
            query: query.into(),
            message: message.to_string(),
        }
    }
}

// Conversions from external error types
impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Self::ConfigError(format!("malformed localconfig: {err}"))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::ConfigError(format!("invalid directory URL: {err}"))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::OutputError(err.to_string())
    }
}
