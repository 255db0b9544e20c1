//! Composition of transformers into the schema-scoped preprocessing
//! pipeline.
//!
//! [`SequentialPipeline`] chains transformers: each stage is fitted on the
//! output of the previous ones, and transform folds through the stages in
//! order. [`PreprocessingPipeline`] wraps a sequential pipeline in a
//! column-selecting composite restricted to the schema's numerical columns,
//! and is the object persisted for the prediction consumer.

use crate::error::{Result, ResultExt, TransformationError};
use crate::schema::DatasetSchema;
use crate::transform::{FeatureRepairer, StandardScaler, Transform};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A single stage of a sequential pipeline.
///
/// Enum dispatch instead of trait objects keeps fitted pipelines
/// serializable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineStage {
    Repair(FeatureRepairer),
    Scale(StandardScaler),
}

impl Transform for PipelineStage {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        match self {
            Self::Repair(t) => t.fit(df),
            Self::Scale(t) => t.fit(df),
        }
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        match self {
            Self::Repair(t) => t.transform(df),
            Self::Scale(t) => t.transform(df),
        }
    }
}

/// Ordered sequence of transformers applied one after another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequentialPipeline {
    stages: Vec<PipelineStage>,
}

impl SequentialPipeline {
    pub fn new(stages: Vec<PipelineStage>) -> Self {
        Self { stages }
    }
}

impl Transform for SequentialPipeline {
    /// Fit each stage on the accumulated output of the stages before it.
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let mut acc = df.clone();
        for stage in &mut self.stages {
            acc = stage.fit_transform(&acc)?;
        }
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut acc = df.clone();
        for stage in &self.stages {
            acc = stage.transform(&acc)?;
        }
        Ok(acc)
    }
}

/// The schema-scoped preprocessing pipeline: feature repair followed by
/// standard scaling, restricted to exactly the schema's numerical columns.
///
/// Constructed unfit; `fit` must run on training data only, after which the
/// object can be persisted with [`PreprocessingPipeline::save`] and later
/// reloaded by the prediction consumer. A pipeline instance belongs to a
/// single run and is not meant to be refitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingPipeline {
    columns: Vec<String>,
    inner: SequentialPipeline,
}

impl PreprocessingPipeline {
    /// Build the pipeline from a dataset schema.
    ///
    /// Fails with a configuration error if the schema's column list does not
    /// contain the columns the repairer needs.
    pub fn from_schema(schema: &DatasetSchema) -> Result<Self> {
        let repairer = FeatureRepairer::from_columns(&schema.numerical_columns)
            .context("Building the feature repairer from schema columns")?;
        debug!("Numerical columns: {:?}", schema.numerical_columns);

        Ok(Self {
            columns: schema.numerical_columns.clone(),
            inner: SequentialPipeline::new(vec![
                PipelineStage::Repair(repairer),
                PipelineStage::Scale(StandardScaler::new()),
            ]),
        })
    }

    /// The column names this pipeline is scoped to, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Select the scoped columns from `df` in schema order, cast to floats.
    /// Any other columns in the frame are ignored.
    fn select(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            let column = df
                .column(name)
                .map_err(|_| TransformationError::ColumnNotFound(name.clone()))?;
            columns.push(column.cast(&DataType::Float64)?);
        }
        Ok(DataFrame::new(columns)?)
    }

    /// Persist the (fitted) pipeline as JSON.
    ///
    /// Writes to a temporary path and renames on success so a crash cannot
    /// leave a truncated object behind.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Creating directory {}", parent.display()))?;
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(self)?)
            .context(format!("Writing pipeline object to {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .context(format!("Moving pipeline object into {}", path.display()))?;

        info!("Saved preprocessing pipeline to {}", path.display());
        Ok(())
    }

    /// Reconstruct a persisted pipeline, fitted statistics included.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .context(format!("Reading pipeline object from {}", path.display()))?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Transform for PreprocessingPipeline {
    fn fit(&mut self, df: &DataFrame) -> Result<()> {
        let selected = self.select(df)?;
        self.inner.fit(&selected)
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let selected = self.select(df)?;
        self.inner.transform(&selected)
    }
}
