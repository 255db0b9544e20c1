//! The transformation orchestrator: one end-to-end run of the stage.
//!
//! Builds the preprocessing pipeline from the schema, fits it on the
//! training frame only, transforms both splits, re-attaches the targets and
//! persists the two arrays plus the fitted pipeline. Outputs are committed
//! all-or-none: everything is written to temporary paths first and renamed
//! into place only after every write succeeded.

use crate::artifact::{IngestionArtifact, TransformationArtifact, ValidationArtifact};
use crate::config::TransformationConfig;
use crate::error::{Result, ResultExt, TransformationError};
use crate::io;
use crate::schema::DatasetSchema;
use crate::transform::{PreprocessingPipeline, Transform};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One transformation run over the ingested train/test frames.
///
/// Each run constructs fresh pipeline state; instances are not reused.
pub struct DataTransformation {
    config: TransformationConfig,
    ingestion: IngestionArtifact,
    validation: ValidationArtifact,
}

impl DataTransformation {
    pub fn new(
        config: TransformationConfig,
        ingestion: IngestionArtifact,
        validation: ValidationArtifact,
    ) -> Self {
        Self {
            config,
            ingestion,
            validation,
        }
    }

    /// Execute the stage and return the artifact describing its outputs.
    ///
    /// Any failure is returned as an error and means no usable output was
    /// produced: the final output paths are only populated on success.
    pub fn run(&self) -> Result<TransformationArtifact> {
        info!("Data transformation started");

        let schema = DatasetSchema::from_yaml_file(&self.validation.schema_path)?;
        let mut pipeline = PreprocessingPipeline::from_schema(&schema)
            .context("Building the preprocessing pipeline")?;

        info!(
            "Loading train frame {} and test frame {}",
            self.ingestion.train_path.display(),
            self.ingestion.test_path.display()
        );
        let train_df = io::load_frame(&self.ingestion.train_path, &schema)?;
        let test_df = io::load_frame(&self.ingestion.test_path, &schema)?;

        debug!("Splitting input features and target");
        let (train_features, train_target) =
            split_features_target(&train_df, &schema.target_column)?;
        let (test_features, test_target) = split_features_target(&test_df, &schema.target_column)?;

        // Fit on train only; the test split is transformed with the
        // statistics learned from train.
        info!("Fitting preprocessing pipeline on training features");
        let train_arr = pipeline.fit_transform(&train_features)?;
        let test_arr = pipeline.transform(&test_features)?;

        let mut train_arr = attach_target(train_arr, &train_target)?;
        let mut test_arr = attach_target(test_arr, &test_target)?;

        let expected_width = schema.numerical_columns.len() + 1;
        check_shape(&train_arr, train_df.height(), expected_width, "train array")?;
        check_shape(&test_arr, test_df.height(), expected_width, "test array")?;

        let train_path = self
            .config
            .transformed_train_dir
            .join(transformed_file_name(&self.ingestion.train_path));
        let test_path = self
            .config
            .transformed_test_dir
            .join(transformed_file_name(&self.ingestion.test_path));
        let object_path = self.config.preprocessed_object_path.clone();

        self.persist_outputs(
            &mut train_arr,
            &mut test_arr,
            &pipeline,
            &train_path,
            &test_path,
            &object_path,
        )?;

        info!("Data transformation complete");
        Ok(TransformationArtifact {
            is_transformed: true,
            message: "Data transformation successful.".to_string(),
            transformed_train_path: train_path,
            transformed_test_path: test_path,
            preprocessed_object_path: object_path,
        })
    }

    /// Write all three outputs to temporary paths, then rename into place.
    fn persist_outputs(
        &self,
        train_arr: &mut DataFrame,
        test_arr: &mut DataFrame,
        pipeline: &PreprocessingPipeline,
        train_path: &Path,
        test_path: &Path,
        object_path: &Path,
    ) -> Result<()> {
        let train_tmp = tmp_path(train_path);
        let test_tmp = tmp_path(test_path);
        let object_tmp = tmp_path(object_path);

        let written = (|| -> Result<()> {
            io::write_parquet(train_arr, &train_tmp)?;
            io::write_parquet(test_arr, &test_tmp)?;
            pipeline.save(&object_tmp)?;
            Ok(())
        })();

        if let Err(e) = written {
            for tmp in [&train_tmp, &test_tmp, &object_tmp] {
                let _ = fs::remove_file(tmp);
            }
            return Err(e).context("Writing transformation outputs");
        }

        for (tmp, path) in [
            (&train_tmp, train_path),
            (&test_tmp, test_path),
            (&object_tmp, object_path),
        ] {
            fs::rename(tmp, path)
                .context(format!("Committing output {}", path.display()))?;
        }

        info!(
            "Saved transformed arrays to {} and {}",
            train_path.display(),
            test_path.display()
        );
        Ok(())
    }
}

/// Split a frame into input features (everything but the target) and the
/// target vector.
fn split_features_target(df: &DataFrame, target_column: &str) -> Result<(DataFrame, Series)> {
    let target = df
        .column(target_column)
        .map_err(|_| TransformationError::ColumnNotFound(target_column.to_string()))?
        .as_materialized_series()
        .clone();
    let features = df.drop(target_column)?;
    Ok((features, target))
}

/// Append the target vector to a transformed feature array as a trailing
/// float column.
fn attach_target(mut arr: DataFrame, target: &Series) -> Result<DataFrame> {
    if arr.height() != target.len() {
        return Err(TransformationError::DataShape {
            context: "target length vs transformed rows".to_string(),
            expected: arr.height(),
            actual: target.len(),
        });
    }
    arr.with_column(target.cast(&DataType::Float64)?)?;
    Ok(arr)
}

fn check_shape(arr: &DataFrame, rows: usize, width: usize, context: &str) -> Result<()> {
    if arr.height() != rows {
        return Err(TransformationError::DataShape {
            context: format!("{context} rows"),
            expected: rows,
            actual: arr.height(),
        });
    }
    if arr.width() != width {
        return Err(TransformationError::DataShape {
            context: format!("{context} width"),
            expected: width,
            actual: arr.width(),
        });
    }
    Ok(())
}

/// Output file name: input stem with the Parquet extension.
fn transformed_file_name(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("transformed");
    PathBuf::from(format!("{stem}.parquet"))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_features_target() {
        let df = df![
            "a" => [1.0, 2.0],
            "b" => [3.0, 4.0],
            "y" => [0.0, 1.0],
        ]
        .unwrap();

        let (features, target) = split_features_target(&df, "y").unwrap();
        assert_eq!(features.width(), 2);
        assert!(features.column("y").is_err());
        assert_eq!(target.len(), 2);
    }

    #[test]
    fn test_split_missing_target_is_configuration_error() {
        let df = df!["a" => [1.0]].unwrap();
        let err = split_features_target(&df, "y").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_attach_target_appends_trailing_column() {
        let arr = df!["a" => [1.0, 2.0]].unwrap();
        let target = Series::new("y".into(), [0i64, 1]);

        let out = attach_target(arr, &target).unwrap();
        assert_eq!(out.width(), 2);
        let names: Vec<String> = out.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names.last().unwrap(), "y");
        // Target is cast to float to match the array dtype.
        assert!(matches!(
            out.column("y").unwrap().dtype(),
            DataType::Float64
        ));
    }

    #[test]
    fn test_attach_target_length_mismatch() {
        let arr = df!["a" => [1.0, 2.0]].unwrap();
        let target = Series::new("y".into(), [0i64]);
        assert!(matches!(
            attach_target(arr, &target).unwrap_err(),
            TransformationError::DataShape { .. }
        ));
    }

    #[test]
    fn test_transformed_file_name() {
        assert_eq!(
            transformed_file_name(Path::new("data/ingested/credit.csv")),
            PathBuf::from("credit.parquet")
        );
    }

    #[test]
    fn test_tmp_path_keeps_directory() {
        let tmp = tmp_path(Path::new("out/train/credit.parquet"));
        assert_eq!(tmp, PathBuf::from("out/train/credit.parquet.tmp"));
    }
}
