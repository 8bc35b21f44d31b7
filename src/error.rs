//! Unified error handling for the brandpulse crate
//!
//! The engines themselves are total: spike detection cannot fail and topic
//! clustering recovers from its own `ClusterError`s. Errors surface only
//! at the edges, when loading configuration or reading a mention batch.
//!
//! # Architecture
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping domain-specific errors

use std::io;
use thiserror::Error;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed or missing input batch
    Input,
    /// Reading a batch or config file failed
    Io,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Io => "io",
            Self::Config => "config",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for the brandpulse crate
#[derive(Error, Debug)]
pub enum Error {
    /// The request did not contain a mention array
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an input validation error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if retrying the same operation could succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Io(_))
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput(_) | Self::Json(_) => ErrorCategory::Input,
            Self::Io(_) => ErrorCategory::Io,
            Self::Toml(_) | Self::Config(_) => ErrorCategory::Config,
            Self::Other { source, .. } => match source {
                Some(source) if source.is::<io::Error>() => ErrorCategory::Io,
                _ => ErrorCategory::Other,
            },
        }
    }
}

// Keeps the whole context chain; anyhow errors only come from config checks
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::config(format!("{err:#}"))
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category() {
        let err = Error::invalid_input("Mentions array is required");
        assert_eq!(err.category(), ErrorCategory::Input);

        let err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.category().to_string(), "io");
    }

    #[test]
    fn test_is_recoverable() {
        let io_err = Error::Io(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
        assert!(io_err.is_recoverable());

        let cfg_err = Error::config("bad seed");
        assert!(!cfg_err.is_recoverable());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        let unified: Error = parse_err.into();
        assert!(matches!(unified, Error::Json(_)));
        assert_eq!(unified.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("Something went wrong");
        assert_eq!(err.category(), ErrorCategory::Other);
        assert_eq!(err.to_string(), "Something went wrong");
    }

    #[test]
    fn test_with_source_keeps_io_category() {
        let err = Error::with_source(
            "Failed to read config file: missing.toml",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.to_string(), "Failed to read config file: missing.toml");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_anyhow_conversion_keeps_context_chain() {
        let inner = anyhow::anyhow!("invalid digit found in string");
        let err: Error = inner.context("Invalid value for BRANDPULSE_MIN_MENTIONS: ten").into();
        assert_eq!(err.category(), ErrorCategory::Config);
        assert_eq!(
            err.to_string(),
            "Config error: Invalid value for BRANDPULSE_MIN_MENTIONS: ten: invalid digit found in string"
        );
    }
}
