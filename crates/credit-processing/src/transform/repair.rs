//! Deterministic repair of known data-entry errors in the credit frame.
//!
//! The raw dataset carries three kinds of miscoding: an undocumented
//! marriage code, three undocumented education codes, and a first
//! repayment-status column whose name does not match the other five. The
//! repairer normalizes all of them before scaling, since the scaler's
//! statistics depend on the repaired values.

use crate::error::{Result, TransformationError};
use crate::schema::{COLUMN_EDUCATION, COLUMN_MARRIAGE, COLUMN_PAY_0, COLUMN_PAY_1, PAY_COLUMNS};
use crate::transform::Transform;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Sentinel "unknown" marriage code present in the raw data.
const MARRIAGE_UNKNOWN: f64 = 0.0;
/// Documented "other" marriage code.
const MARRIAGE_OTHER: f64 = 3.0;
/// Undocumented education codes present in the raw data.
const EDUCATION_INVALID: [f64; 3] = [0.0, 5.0, 6.0];
/// Documented "other" education code.
const EDUCATION_OTHER: f64 = 4.0;
/// Reserved repayment codes: -1 "paid in full", -2 "no consumption".
/// Downstream scaling treats both as equivalent to on-time.
const PAY_RESERVED: [f64; 2] = [-1.0, -2.0];
/// The "on time" repayment code.
const PAY_ON_TIME: f64 = 0.0;

/// Stateless transformer that repairs the marriage, education and
/// repayment-status columns.
///
/// Column positions are resolved once at construction and frozen; frames
/// passed to [`Transform::transform`] are expected to carry their columns in
/// the same order as the sequence the repairer was built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRepairer {
    marriage_idx: usize,
    education_idx: usize,
    pay_0_idx: usize,
}

impl FeatureRepairer {
    /// Build a repairer from explicit column positions.
    pub fn from_positions(marriage_idx: usize, education_idx: usize, pay_0_idx: usize) -> Self {
        Self {
            marriage_idx,
            education_idx,
            pay_0_idx,
        }
    }

    /// Build a repairer by resolving the marriage, education and first
    /// repayment-status positions from an ordered column-name sequence.
    pub fn from_columns(columns: &[String]) -> Result<Self> {
        let position = |name: &str| -> Result<usize> {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| TransformationError::ColumnNotFound(name.to_string()))
        };

        Ok(Self {
            marriage_idx: position(COLUMN_MARRIAGE)?,
            education_idx: position(COLUMN_EDUCATION)?,
            pay_0_idx: position(COLUMN_PAY_0)?,
        })
    }

    fn check_positions(&self, df: &DataFrame) -> Result<()> {
        for idx in [self.marriage_idx, self.education_idx, self.pay_0_idx] {
            if idx >= df.width() {
                return Err(TransformationError::DataShape {
                    context: "frame width for frozen column position".to_string(),
                    expected: idx + 1,
                    actual: df.width(),
                });
            }
        }
        Ok(())
    }
}

impl Transform for FeatureRepairer {
    fn fit(&mut self, _df: &DataFrame) -> Result<()> {
        // Stateless; present to satisfy the fit/transform protocol.
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        self.check_positions(df)?;
        let mut out = df.clone();

        let marriage_name = out.get_column_names()[self.marriage_idx].to_string();
        let repaired = recode(
            out.column(&marriage_name)?.as_materialized_series(),
            &[MARRIAGE_UNKNOWN],
            MARRIAGE_OTHER,
        )?;
        out.replace(&marriage_name, repaired)?;

        let education_name = out.get_column_names()[self.education_idx].to_string();
        let repaired = recode(
            out.column(&education_name)?.as_materialized_series(),
            &EDUCATION_INVALID,
            EDUCATION_OTHER,
        )?;
        out.replace(&education_name, repaired)?;

        // The raw schema labels the first repayment-status column PAY_0
        // while downstream features use PAY_1; reconcile by position.
        let pay_0_name = out.get_column_names()[self.pay_0_idx].to_string();
        out.rename(&pay_0_name, COLUMN_PAY_1.into())?;

        for name in PAY_COLUMNS {
            let repaired = recode(
                out.column(name)?.as_materialized_series(),
                &PAY_RESERVED,
                PAY_ON_TIME,
            )?;
            out.replace(name, repaired)?;
        }

        Ok(out)
    }
}

/// Rewrite every occurrence of the `from` codes to `to`, leaving all other
/// values untouched. The column is cast to `Float64`.
fn recode(series: &Series, from: &[f64], to: f64) -> Result<Series> {
    let casted = series.cast(&DataType::Float64)?;
    let ca = casted.f64()?;
    let repaired = ca.apply_values(|v| if from.contains(&v) { to } else { v });
    Ok(repaired.into_series())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_frame() -> DataFrame {
        df![
            "MARRIAGE" => [0.0, 1.0, 2.0, 3.0],
            "EDUCATION" => [0.0, 5.0, 6.0, 2.0],
            "PAY_0" => [-2.0, -1.0, 0.0, 2.0],
            "PAY_2" => [-1.0, 0.0, 1.0, 2.0],
            "PAY_3" => [0.0, 0.0, 0.0, 0.0],
            "PAY_4" => [-2.0, -2.0, 3.0, 4.0],
            "PAY_5" => [1.0, 2.0, -1.0, 0.0],
            "PAY_6" => [0.0, -1.0, -2.0, 8.0],
        ]
        .unwrap()
    }

    fn sample_repairer() -> FeatureRepairer {
        let columns: Vec<String> = sample_frame()
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        FeatureRepairer::from_columns(&columns).unwrap()
    }

    fn column_values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .into_no_null_iter()
            .collect()
    }

    #[test]
    fn test_marriage_unknown_code_maps_to_other() {
        let out = sample_repairer().transform(&sample_frame()).unwrap();
        assert_eq!(column_values(&out, "MARRIAGE"), vec![3.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_education_invalid_codes_map_to_other() {
        let out = sample_repairer().transform(&sample_frame()).unwrap();
        assert_eq!(column_values(&out, "EDUCATION"), vec![4.0, 4.0, 4.0, 2.0]);
    }

    #[test]
    fn test_pay_columns_collapse_reserved_codes() {
        let out = sample_repairer().transform(&sample_frame()).unwrap();
        assert_eq!(column_values(&out, "PAY_1"), vec![0.0, 0.0, 0.0, 2.0]);
        assert_eq!(column_values(&out, "PAY_2"), vec![0.0, 0.0, 1.0, 2.0]);
        assert_eq!(column_values(&out, "PAY_4"), vec![0.0, 0.0, 3.0, 4.0]);
        assert_eq!(column_values(&out, "PAY_6"), vec![0.0, 0.0, 0.0, 8.0]);
    }

    #[test]
    fn test_first_pay_column_renamed_by_position() {
        // The rename keys off the frozen position, not the original name.
        let df = df![
            "MARRIAGE" => [1.0],
            "EDUCATION" => [2.0],
            "REPAY_SEPT" => [0.0],
            "PAY_2" => [0.0],
            "PAY_3" => [0.0],
            "PAY_4" => [0.0],
            "PAY_5" => [0.0],
            "PAY_6" => [0.0],
        ]
        .unwrap();

        let repairer = FeatureRepairer::from_positions(0, 1, 2);
        let out = repairer.transform(&df).unwrap();

        assert!(out.column("PAY_1").is_ok());
        assert!(out.column("REPAY_SEPT").is_err());
    }

    #[test]
    fn test_shape_preserved() {
        let input = sample_frame();
        let out = sample_repairer().transform(&input).unwrap();
        assert_eq!(out.height(), input.height());
        assert_eq!(out.width(), input.width());

        // Column order is preserved, modulo the PAY_0 rename.
        let names: Vec<String> = out.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names[0], "MARRIAGE");
        assert_eq!(names[2], "PAY_1");
        assert_eq!(names[7], "PAY_6");
    }

    #[test]
    fn test_input_frame_not_mutated() {
        let input = sample_frame();
        let _ = sample_repairer().transform(&input).unwrap();
        assert_eq!(column_values(&input, "MARRIAGE"), vec![0.0, 1.0, 2.0, 3.0]);
        assert!(input.column("PAY_0").is_ok());
    }

    #[test]
    fn test_repair_is_idempotent() {
        let repairer = sample_repairer();
        let once = repairer.transform(&sample_frame()).unwrap();
        let twice = repairer.transform(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_integer_columns_are_handled() {
        let df = df![
            "MARRIAGE" => [0i64, 2],
            "EDUCATION" => [5i64, 1],
            "PAY_0" => [-2i64, 1],
            "PAY_2" => [0i64, 0],
            "PAY_3" => [0i64, 0],
            "PAY_4" => [0i64, 0],
            "PAY_5" => [0i64, 0],
            "PAY_6" => [-1i64, 2],
        ]
        .unwrap();

        let out = sample_repairer().transform(&df).unwrap();
        assert_eq!(column_values(&out, "MARRIAGE"), vec![3.0, 2.0]);
        assert_eq!(column_values(&out, "PAY_1"), vec![0.0, 1.0]);
        assert_eq!(column_values(&out, "PAY_6"), vec![0.0, 2.0]);
    }

    #[test]
    fn test_missing_named_column_is_configuration_error() {
        let columns = vec!["LIMIT_BAL".to_string(), "AGE".to_string()];
        let err = FeatureRepairer::from_columns(&columns).unwrap_err();
        assert!(matches!(err, TransformationError::ColumnNotFound(ref c) if c == "MARRIAGE"));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_position_out_of_range_is_shape_error() {
        let df = df!["MARRIAGE" => [1.0]].unwrap();
        let repairer = FeatureRepairer::from_positions(0, 1, 2);
        assert!(matches!(
            repairer.transform(&df).unwrap_err(),
            TransformationError::DataShape { .. }
        ));
    }

    #[test]
    fn test_fit_is_a_no_op() {
        let mut repairer = sample_repairer();
        assert!(repairer.fit(&sample_frame()).is_ok());
    }
}
