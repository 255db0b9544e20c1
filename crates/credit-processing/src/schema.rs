//! Dataset schema loading and column-name constants.
//!
//! The schema is a declarative YAML document produced by the validation
//! stage. It lists the numerical feature columns (in order) and names the
//! prediction target; the preprocessing pipeline is scoped to exactly those
//! columns so the same code survives dataset schema revisions.

use crate::error::{Result, TransformationError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Raw name of the marriage-status column.
pub const COLUMN_MARRIAGE: &str = "MARRIAGE";
/// Raw name of the education-level column.
pub const COLUMN_EDUCATION: &str = "EDUCATION";
/// Raw name of the first repayment-status column as it appears in the
/// source data. Renamed to [`COLUMN_PAY_1`] during repair.
pub const COLUMN_PAY_0: &str = "PAY_0";
/// Canonical name of the first repayment-status column after repair.
pub const COLUMN_PAY_1: &str = "PAY_1";

/// The six repayment-status columns in their canonical (post-repair) names.
pub const PAY_COLUMNS: [&str; 6] = ["PAY_1", "PAY_2", "PAY_3", "PAY_4", "PAY_5", "PAY_6"];

/// Declarative description of the dataset columns.
///
/// Loaded once per pipeline construction and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSchema {
    /// Ordered list of numerical feature column names.
    pub numerical_columns: Vec<String>,
    /// Name of the prediction target column.
    pub target_column: String,
}

impl DatasetSchema {
    /// Load a schema from a YAML document on disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TransformationError::Io(e)
                .with_context(format!("Reading schema file {}", path.display()))
        })?;
        let schema: DatasetSchema = serde_yaml::from_str(&content)?;
        schema.validate()?;
        debug!(
            "Loaded schema: {} numerical columns, target '{}'",
            schema.numerical_columns.len(),
            schema.target_column
        );
        Ok(schema)
    }

    /// Check the schema itself for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.numerical_columns.is_empty() {
            return Err(TransformationError::Schema(
                "numerical_columns is empty".to_string(),
            ));
        }
        if self.target_column.is_empty() {
            return Err(TransformationError::Schema(
                "target_column is empty".to_string(),
            ));
        }
        if self.numerical_columns.contains(&self.target_column) {
            return Err(TransformationError::Schema(format!(
                "target column '{}' must not appear in numerical_columns",
                self.target_column
            )));
        }
        Ok(())
    }

    /// Verify that a loaded frame carries every column the schema requires.
    pub fn validate_frame(&self, df: &DataFrame) -> Result<()> {
        for name in self.numerical_columns.iter().chain([&self.target_column]) {
            if df.column(name).is_err() {
                return Err(TransformationError::ColumnNotFound(name.clone()));
            }
        }
        Ok(())
    }
}
