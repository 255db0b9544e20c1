//! Standard scaling: subtract per-column mean, divide by per-column
//! standard deviation.
//!
//! Statistics are learned once on the training frame and frozen; applying
//! the scaler to any other frame uses those frozen statistics, which is the
//! train/test-isolation invariant of the whole stage.

use crate::error::{Result, TransformationError};
use crate::transform::Transform;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Learned statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub mean: f64,
    pub std: f64,
}

/// Per-column standard scaler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    stats: Option<Vec<ColumnStats>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fitted per-column statistics, or `None` before `fit`.
    pub fn stats(&self) -> Option<&[ColumnStats]> {
        self.stats.as_deref()
    }
}

impl Transform for StandardScaler {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let mut stats = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let series = column.as_materialized_series().cast(&DataType::Float64)?;
            let ca = series.f64()?;
            let mean = ca.mean().unwrap_or(0.0);
            // Population std (ddof 0): unit variance relative to the batch.
            // Constant columns get std 1.0 so they pass through centered.
            let std = match ca.std(0) {
                Some(s) if s > 0.0 => s,
                _ => 1.0,
            };
            stats.push(ColumnStats {
                name: column.name().to_string(),
                mean,
                std,
            });
        }
        self.stats = Some(stats);
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let stats = self.stats.as_ref().ok_or(TransformationError::NotFitted)?;

        let mut columns = Vec::with_capacity(stats.len());
        for stat in stats {
            let column = df
                .column(&stat.name)
                .map_err(|_| TransformationError::ColumnNotFound(stat.name.clone()))?;
            let series = column.as_materialized_series().cast(&DataType::Float64)?;
            let ca = series.f64()?;
            let scaled = ca.apply_values(|v| (v - stat.mean) / stat.std);
            columns.push(scaled.into_series().into_column());
        }

        Ok(DataFrame::new(columns)?)
    }
}
