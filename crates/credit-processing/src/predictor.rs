//! Consumer-side feature preparation for the prediction service.
//!
//! The prediction component loads the persisted fitted pipeline and feeds
//! it single-row frames built from raw credit records; the output numeric
//! row is what the trained model consumes. Model loading and prediction
//! themselves live in the trainer's crate, not here.

use crate::error::{Result, ResultExt, TransformationError};
use crate::transform::{PreprocessingPipeline, Transform};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One raw credit record with the 23 input feature columns, by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditRecord {
    #[serde(rename = "LIMIT_BAL")]
    pub limit_bal: f64,
    #[serde(rename = "SEX")]
    pub sex: i64,
    #[serde(rename = "EDUCATION")]
    pub education: i64,
    #[serde(rename = "MARRIAGE")]
    pub marriage: i64,
    #[serde(rename = "AGE")]
    pub age: i64,
    #[serde(rename = "PAY_0")]
    pub pay_0: i64,
    #[serde(rename = "PAY_2")]
    pub pay_2: i64,
    #[serde(rename = "PAY_3")]
    pub pay_3: i64,
    #[serde(rename = "PAY_4")]
    pub pay_4: i64,
    #[serde(rename = "PAY_5")]
    pub pay_5: i64,
    #[serde(rename = "PAY_6")]
    pub pay_6: i64,
    #[serde(rename = "BILL_AMT1")]
    pub bill_amt1: f64,
    #[serde(rename = "BILL_AMT2")]
    pub bill_amt2: f64,
    #[serde(rename = "BILL_AMT3")]
    pub bill_amt3: f64,
    #[serde(rename = "BILL_AMT4")]
    pub bill_amt4: f64,
    #[serde(rename = "BILL_AMT5")]
    pub bill_amt5: f64,
    #[serde(rename = "BILL_AMT6")]
    pub bill_amt6: f64,
    #[serde(rename = "PAY_AMT1")]
    pub pay_amt1: f64,
    #[serde(rename = "PAY_AMT2")]
    pub pay_amt2: f64,
    #[serde(rename = "PAY_AMT3")]
    pub pay_amt3: f64,
    #[serde(rename = "PAY_AMT4")]
    pub pay_amt4: f64,
    #[serde(rename = "PAY_AMT5")]
    pub pay_amt5: f64,
    #[serde(rename = "PAY_AMT6")]
    pub pay_amt6: f64,
}

impl CreditRecord {
    /// Build a single-row frame with the raw column names.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = df![
            "LIMIT_BAL" => [self.limit_bal],
            "SEX" => [self.sex as f64],
            "EDUCATION" => [self.education as f64],
            "MARRIAGE" => [self.marriage as f64],
            "AGE" => [self.age as f64],
            "PAY_0" => [self.pay_0 as f64],
            "PAY_2" => [self.pay_2 as f64],
            "PAY_3" => [self.pay_3 as f64],
            "PAY_4" => [self.pay_4 as f64],
            "PAY_5" => [self.pay_5 as f64],
            "PAY_6" => [self.pay_6 as f64],
            "BILL_AMT1" => [self.bill_amt1],
            "BILL_AMT2" => [self.bill_amt2],
            "BILL_AMT3" => [self.bill_amt3],
            "BILL_AMT4" => [self.bill_amt4],
            "BILL_AMT5" => [self.bill_amt5],
            "BILL_AMT6" => [self.bill_amt6],
            "PAY_AMT1" => [self.pay_amt1],
            "PAY_AMT2" => [self.pay_amt2],
            "PAY_AMT3" => [self.pay_amt3],
            "PAY_AMT4" => [self.pay_amt4],
            "PAY_AMT5" => [self.pay_amt5],
            "PAY_AMT6" => [self.pay_amt6],
        ]?;
        Ok(df)
    }
}

/// Wraps a loaded fitted pipeline and turns raw records into the numeric
/// rows the model consumes.
pub struct FeaturePreparer {
    pipeline: PreprocessingPipeline,
}

impl FeaturePreparer {
    /// Load the fitted pipeline persisted by the transformation stage.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let pipeline = PreprocessingPipeline::load(path)
            .context("Loading the preprocessing pipeline for prediction")?;
        Ok(Self { pipeline })
    }

    pub fn new(pipeline: PreprocessingPipeline) -> Self {
        Self { pipeline }
    }

    /// Transform one raw record into a feature row, in the pipeline's
    /// column order.
    pub fn prepare(&self, record: &CreditRecord) -> Result<Vec<f64>> {
        let frame = record.to_frame()?;
        let transformed = self.pipeline.transform(&frame)?;

        let mut row = Vec::with_capacity(transformed.width());
        for column in transformed.get_columns() {
            let value = column
                .as_materialized_series()
                .f64()?
                .get(0)
                .ok_or_else(|| TransformationError::DataShape {
                    context: "prepared feature row".to_string(),
                    expected: 1,
                    actual: 0,
                })?;
            row.push(value);
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DatasetSchema;

    fn sample_record() -> CreditRecord {
        CreditRecord {
            limit_bal: 20000.0,
            sex: 2,
            education: 0,
            marriage: 0,
            age: 24,
            pay_0: -2,
            pay_2: 0,
            pay_3: 0,
            pay_4: 0,
            pay_5: 0,
            pay_6: 0,
            bill_amt1: 3913.0,
            bill_amt2: 3102.0,
            bill_amt3: 689.0,
            bill_amt4: 0.0,
            bill_amt5: 0.0,
            bill_amt6: 0.0,
            pay_amt1: 0.0,
            pay_amt2: 689.0,
            pay_amt3: 0.0,
            pay_amt4: 0.0,
            pay_amt5: 0.0,
            pay_amt6: 0.0,
        }
    }

    #[test]
    fn test_record_to_frame_has_all_raw_columns() {
        let frame = sample_record().to_frame().unwrap();
        assert_eq!(frame.shape(), (1, 23));
        assert!(frame.column("PAY_0").is_ok());
        assert!(frame.column("BILL_AMT6").is_ok());
    }

    #[test]
    fn test_record_deserializes_from_raw_column_names() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        assert!(json.contains("\"LIMIT_BAL\""));
        let back: CreditRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.limit_bal, 20000.0);
    }

    #[test]
    fn test_prepare_produces_one_value_per_pipeline_column() {
        let schema = DatasetSchema {
            numerical_columns: vec![
                "LIMIT_BAL",
                "EDUCATION",
                "MARRIAGE",
                "AGE",
                "PAY_0",
                "PAY_2",
                "PAY_3",
                "PAY_4",
                "PAY_5",
                "PAY_6",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            target_column: "default_payment".to_string(),
        };

        let train = df![
            "LIMIT_BAL" => [10000.0, 20000.0, 50000.0],
            "EDUCATION" => [1.0, 2.0, 3.0],
            "MARRIAGE" => [1.0, 2.0, 1.0],
            "AGE" => [24.0, 35.0, 52.0],
            "PAY_0" => [0.0, 1.0, -1.0],
            "PAY_2" => [0.0, 0.0, 0.0],
            "PAY_3" => [0.0, 0.0, 0.0],
            "PAY_4" => [0.0, 0.0, 0.0],
            "PAY_5" => [0.0, 0.0, 0.0],
            "PAY_6" => [0.0, 0.0, 0.0],
        ]
        .unwrap();

        let mut pipeline = PreprocessingPipeline::from_schema(&schema).unwrap();
        pipeline.fit(&train).unwrap();

        let preparer = FeaturePreparer::new(pipeline);
        let row = preparer.prepare(&sample_record()).unwrap();
        assert_eq!(row.len(), schema.numerical_columns.len());
        assert!(row.iter().all(|v| v.is_finite()));
    }
}
