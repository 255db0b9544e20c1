//! Configuration for the data transformation stage.
//!
//! Output locations are configured with the builder pattern; everything else
//! the stage needs (schema path, input frame paths) arrives through the
//! upstream stage artifacts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one transformation run.
///
/// Use [`TransformationConfig::builder()`] to create a configuration with a
/// fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use credit_processing::TransformationConfig;
///
/// let config = TransformationConfig::builder()
///     .transformed_train_dir("artifacts/transformed/train")
///     .transformed_test_dir("artifacts/transformed/test")
///     .preprocessed_object_path("artifacts/preprocessed/pipeline.json")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationConfig {
    /// Directory for the transformed training array.
    /// Default: "artifacts/transformed/train"
    pub transformed_train_dir: PathBuf,

    /// Directory for the transformed test array.
    /// Default: "artifacts/transformed/test"
    pub transformed_test_dir: PathBuf,

    /// File path for the persisted fitted-pipeline object.
    /// Default: "artifacts/preprocessed/pipeline.json"
    pub preprocessed_object_path: PathBuf,
}

impl Default for TransformationConfig {
    fn default() -> Self {
        Self {
            transformed_train_dir: PathBuf::from("artifacts/transformed/train"),
            transformed_test_dir: PathBuf::from("artifacts/transformed/test"),
            preprocessed_object_path: PathBuf::from("artifacts/preprocessed/pipeline.json"),
        }
    }
}

impl TransformationConfig {
    /// Create a new configuration builder.
    pub fn builder() -> TransformationConfigBuilder {
        TransformationConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, path) in [
            ("transformed_train_dir", &self.transformed_train_dir),
            ("transformed_test_dir", &self.transformed_test_dir),
            ("preprocessed_object_path", &self.preprocessed_object_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyPath {
                    field: field.to_string(),
                });
            }
        }

        if self.preprocessed_object_path.file_name().is_none() {
            return Err(ConfigValidationError::NotAFilePath {
                field: "preprocessed_object_path".to_string(),
                value: self.preprocessed_object_path.clone(),
            });
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Path for '{field}' must not be empty")]
    EmptyPath { field: String },

    #[error("'{field}' must be a file path, got: {value}")]
    NotAFilePath { field: String, value: PathBuf },
}

/// Builder for [`TransformationConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct TransformationConfigBuilder {
    transformed_train_dir: Option<PathBuf>,
    transformed_test_dir: Option<PathBuf>,
    preprocessed_object_path: Option<PathBuf>,
}

impl TransformationConfigBuilder {
    /// Set the directory for the transformed training array.
    pub fn transformed_train_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.transformed_train_dir = Some(path.into());
        self
    }

    /// Set the directory for the transformed test array.
    pub fn transformed_test_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.transformed_test_dir = Some(path.into());
        self
    }

    /// Set the file path for the persisted fitted-pipeline object.
    pub fn preprocessed_object_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preprocessed_object_path = Some(path.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `TransformationConfig` or an error if validation
    /// fails.
    pub fn build(self) -> Result<TransformationConfig, ConfigValidationError> {
        let defaults = TransformationConfig::default();
        let config = TransformationConfig {
            transformed_train_dir: self
                .transformed_train_dir
                .unwrap_or(defaults.transformed_train_dir),
            transformed_test_dir: self
                .transformed_test_dir
                .unwrap_or(defaults.transformed_test_dir),
            preprocessed_object_path: self
                .preprocessed_object_path
                .unwrap_or(defaults.preprocessed_object_path),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TransformationConfig::default();
        assert_eq!(
            config.transformed_train_dir,
            PathBuf::from("artifacts/transformed/train")
        );
        assert_eq!(
            config.preprocessed_object_path,
            PathBuf::from("artifacts/preprocessed/pipeline.json")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = TransformationConfig::builder()
            .transformed_train_dir("out/train")
            .transformed_test_dir("out/test")
            .preprocessed_object_path("out/pipeline.json")
            .build()
            .unwrap();

        assert_eq!(config.transformed_train_dir, PathBuf::from("out/train"));
        assert_eq!(config.transformed_test_dir, PathBuf::from("out/test"));
        assert_eq!(
            config.preprocessed_object_path,
            PathBuf::from("out/pipeline.json")
        );
    }

    #[test]
    fn test_validation_rejects_empty_path() {
        let result = TransformationConfig::builder()
            .transformed_train_dir("")
            .build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::EmptyPath { .. }
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = TransformationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: TransformationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(
            config.preprocessed_object_path,
            deserialized.preprocessed_object_path
        );
    }
}
