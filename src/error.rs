//! Error types for keyed-batcher
//!
//! The partitioning core is total and never returns an error. Everything
//! around it (config loading, decoding, key extraction, output) reports
//! failures through the `Error` defined here.

use crate::batch::Violation;
use thiserror::Error;

/// The main error type for keyed-batcher
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    #[error("Failed to decode input: {message}")]
    Decode { message: String },

    #[error("CSV parsing error: {message}")]
    CsvParse { message: String },

    #[error("Record {index} has no usable key at '{field}'")]
    MissingKey { index: usize, field: String },

    // ============================================================================
    // Batch Errors
    // ============================================================================
    #[error("Batch invariant violated: {0}")]
    Invariant(#[from] Violation),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a CSV parse error
    pub fn csv(message: impl Into<String>) -> Self {
        Self::CsvParse {
            message: message.into(),
        }
    }

    /// Create a missing key error
    pub fn missing_key(index: usize, field: impl Into<String>) -> Self {
        Self::MissingKey {
            index,
            field: field.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Whether this error comes from user-supplied input rather than the environment
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::JsonParse(_)
                | Error::JsonPath { .. }
                | Error::Decode { .. }
                | Error::CsvParse { .. }
                | Error::MissingKey { .. }
        )
    }
}

/// Result type alias for keyed-batcher
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_key(3, "contact.email");
        assert_eq!(
            err.to_string(),
            "Record 3 has no usable key at 'contact.email'"
        );

        let err = Error::invalid_value("key_field", "must not be empty");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'key_field': must not be empty"
        );
    }

    #[test]
    fn test_invariant_from_violation() {
        let err: Error = Violation::RecordCountMismatch {
            expected: 5,
            actual: 4,
        }
        .into();
        assert!(err.to_string().starts_with("Batch invariant violated:"));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_is_input_error() {
        assert!(Error::decode("bad").is_input_error());
        assert!(Error::csv("bad").is_input_error());
        assert!(Error::missing_key(0, "email").is_input_error());

        assert!(!Error::config("bad").is_input_error());
        assert!(!Error::output("bad").is_input_error());
    }

    #[test]
    fn test_json_parse_from_serde() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Error::JsonParse(_)));
        assert!(err.to_string().starts_with("Failed to parse JSON:"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
