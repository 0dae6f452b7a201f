//! Error types for the Cancellation Analysis crate
//!
//! Provides structured error types for model loading, parsing, and I/O
//! operations. The rule evaluator itself cannot fail on well-formed input
//! and reports nothing through this module.

use thiserror::Error;

/// Main error type for analysis operations
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Invalid input data or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File access or I/O error
    #[error("File error: {0}")]
    FileError(String),

    /// Symbol model parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Symbol model structure error
    #[error("Model error: {0}")]
    ModelError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AnalyzerError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AnalyzerError::InvalidInput(msg.into())
    }

    /// Create a file error
    pub fn file_error(msg: impl Into<String>) -> Self {
        AnalyzerError::FileError(msg.into())
    }

    /// Create a parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        AnalyzerError::ParseError(msg.into())
    }

    /// Create a model error
    pub fn model_error(msg: impl Into<String>) -> Self {
        AnalyzerError::ModelError(msg.into())
    }

    /// Check if this is a user-facing error (vs internal)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            AnalyzerError::InvalidInput(_)
                | AnalyzerError::FileError(_)
                | AnalyzerError::ParseError(_)
                | AnalyzerError::ModelError(_)
        )
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(err: std::io::Error) -> Self {
        AnalyzerError::FileError(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        AnalyzerError::ParseError(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for AnalyzerError {
    fn from(err: serde_yaml::Error) -> Self {
        AnalyzerError::ParseError(format!("YAML error: {}", err))
    }
}

impl From<toml::de::Error> for AnalyzerError {
    fn from(err: toml::de::Error) -> Self {
        AnalyzerError::ParseError(format!("TOML error: {}", err))
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyzerError::InvalidInput("test error".to_string());
        assert_eq!(err.to_string(), "Invalid input: test error");
    }

    #[test]
    fn test_is_user_error() {
        assert!(AnalyzerError::InvalidInput("test".to_string()).is_user_error());
        assert!(AnalyzerError::FileError("test".to_string()).is_user_error());
        assert!(AnalyzerError::ModelError("test".to_string()).is_user_error());
        assert!(!AnalyzerError::InternalError("test".to_string()).is_user_error());
    }

    #[test]
    fn test_error_constructors() {
        let err = AnalyzerError::invalid_input("test");
        assert!(matches!(err, AnalyzerError::InvalidInput(_)));

        let err = AnalyzerError::file_error("test");
        assert!(matches!(err, AnalyzerError::FileError(_)));

        let err = AnalyzerError::parse_error("test");
        assert!(matches!(err, AnalyzerError::ParseError(_)));

        let err = AnalyzerError::model_error("test");
        assert!(matches!(err, AnalyzerError::ModelError(_)));
    }
}
