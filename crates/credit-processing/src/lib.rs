//! Credit-Default Data Transformation Stage
//!
//! A batch pipeline stage, built with Rust and Polars, that prepares the
//! UCI credit-default tabular dataset for model training.
//!
//! # Overview
//!
//! Given the train/test CSV frames produced by the ingestion stage and the
//! schema validated by the validation stage, this crate:
//!
//! - **Repairs known data-entry errors**: miscoded marriage/education
//!   categories and the misnamed first repayment-status column
//! - **Scales numerical features**: per-column standard scaling with
//!   statistics learned on the training split only
//! - **Scopes everything to the schema**: column selection is driven by the
//!   schema document, not hardcoded column lists
//! - **Persists the stage outputs atomically**: two transformed Parquet
//!   arrays plus the fitted pipeline object for the prediction consumer
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use credit_processing::{
//!     DataTransformation, IngestionArtifact, TransformationConfig, ValidationArtifact,
//! };
//!
//! let config = TransformationConfig::builder()
//!     .transformed_train_dir("artifacts/transformed/train")
//!     .transformed_test_dir("artifacts/transformed/test")
//!     .preprocessed_object_path("artifacts/preprocessed/pipeline.json")
//!     .build()?;
//!
//! let artifact = DataTransformation::new(
//!     config,
//!     IngestionArtifact {
//!         train_path: "artifacts/ingested/train/credit.csv".into(),
//!         test_path: "artifacts/ingested/test/credit.csv".into(),
//!     },
//!     ValidationArtifact {
//!         schema_path: "config/schema.yaml".into(),
//!     },
//! )
//! .run()?;
//!
//! println!("Transformed train array: {}", artifact.transformed_train_path.display());
//! ```
//!
//! # Prediction consumer
//!
//! The persisted pipeline object is reloaded later by the prediction
//! component via [`FeaturePreparer`]:
//!
//! ```rust,ignore
//! use credit_processing::{CreditRecord, FeaturePreparer};
//!
//! let preparer = FeaturePreparer::load("artifacts/preprocessed/pipeline.json")?;
//! let row = preparer.prepare(&record)?; // ready for model.predict
//! ```

pub mod artifact;
pub mod config;
pub mod error;
pub mod io;
pub mod predictor;
pub mod schema;
pub mod stage;
pub mod transform;

// Re-exports for convenient access
pub use artifact::{IngestionArtifact, TransformationArtifact, ValidationArtifact};
pub use config::{ConfigValidationError, TransformationConfig, TransformationConfigBuilder};
pub use error::{Result as TransformationResult, ResultExt, TransformationError};
pub use predictor::{CreditRecord, FeaturePreparer};
pub use schema::DatasetSchema;
pub use stage::DataTransformation;
pub use transform::{
    FeatureRepairer, PipelineStage, PreprocessingPipeline, SequentialPipeline, StandardScaler,
    Transform,
};
