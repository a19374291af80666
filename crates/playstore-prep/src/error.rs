//! Error types for the preparation pipeline.
//!
//! Coercion failures never surface here: unparseable cells become nulls.
//! Everything in [`PrepError`] is fatal for the run.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the preparation pipeline.
#[derive(Error, Debug)]
pub enum PrepError {
    /// An input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// An input file lacks columns the pipeline depends on.
    #[error("File '{file}' is missing required columns: {}", .columns.join(", "))]
    MissingColumns { file: String, columns: Vec<String> },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PrepError>,
    },
}

impl PrepError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PrepError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, independent of the message text.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "INPUT_NOT_FOUND",
            Self::MissingColumns { .. } => "MISSING_COLUMNS",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// True when the error comes from reading the inputs (missing file,
    /// missing columns, unreadable CSV).
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InputNotFound(_) | Self::MissingColumns { .. } => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as `{code, message}` so the JSON run output can carry them.
impl Serialize for PrepError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PrepError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PrepError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            PrepError::InputNotFound(PathBuf::from("x.csv")).error_code(),
            "INPUT_NOT_FOUND"
        );
        assert_eq!(
            PrepError::ColumnNotFound("App".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_missing_columns_message() {
        let error = PrepError::MissingColumns {
            file: "reviews.csv".to_string(),
            columns: vec!["App".to_string(), "Sentiment".to_string()],
        };
        let message = error.to_string();
        assert!(message.contains("reviews.csv"));
        assert!(message.contains("App, Sentiment"));
    }

    #[test]
    fn test_is_input_error() {
        assert!(PrepError::InputNotFound(PathBuf::from("a.csv")).is_input_error());
        assert!(
            PrepError::InputNotFound(PathBuf::from("a.csv"))
                .with_context("Loading catalog")
                .is_input_error()
        );
        assert!(!PrepError::InvalidConfig("bad".to_string()).is_input_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = PrepError::ColumnNotFound("Category".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Category"));
    }

    #[test]
    fn test_with_context() {
        let error = PrepError::ColumnNotFound("App".to_string()).with_context("During merge");
        assert!(error.to_string().contains("During merge"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
    }
}
