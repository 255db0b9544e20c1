//! Custom error types for the data transformation stage.
//!
//! This module provides the error hierarchy for the stage using `thiserror`.
//! The policy is wrap-and-rethrow: errors are wrapped with context at module
//! boundaries via [`ResultExt::context`], never swallowed, and the
//! orchestrator either returns a fully populated artifact or an error.

use thiserror::Error;

/// The main error type for the transformation stage.
#[derive(Error, Debug)]
pub enum TransformationError {
    /// Column was not found in the dataset or schema column list.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// The schema document is missing a key or is otherwise unusable.
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// A transformer that requires fitted statistics was used before `fit`.
    #[error("Transformer has not been fitted; call fit on training data first")]
    NotFitted,

    /// Row or column counts do not match what the schema implies.
    #[error("Shape mismatch in {context}: expected {expected}, got {actual}")]
    DataShape {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error (persisted pipeline object).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error (schema document).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<TransformationError>,
    },
}

impl TransformationError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        TransformationError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this error is a configuration-class failure (bad schema or
    /// column lookup) rather than an IO or data-shape failure.
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::ColumnNotFound(_) | Self::Schema(_) => true,
            Self::WithContext { source, .. } => source.is_configuration(),
            _ => false,
        }
    }
}

/// Result type alias for transformation operations.
pub type Result<T> = std::result::Result<T, TransformationError>;

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
        self.map_err(|e| TransformationError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| TransformationError::Io(e).with_context(context))
    }
}
