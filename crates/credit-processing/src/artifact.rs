//! Artifact records passed between pipeline stages.
//!
//! Each stage of the training pipeline hands a structured record to the
//! next; this stage consumes the ingestion and validation artifacts and
//! produces a [`TransformationArtifact`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output of the ingestion stage: where the split frames landed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionArtifact {
    /// Path to the ingested training CSV.
    pub train_path: PathBuf,
    /// Path to the ingested test CSV.
    pub test_path: PathBuf,
}

/// Output of the validation stage: which schema the frames were checked
/// against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationArtifact {
    /// Path to the validated schema document.
    pub schema_path: PathBuf,
}

/// Output of the transformation stage.
///
/// On success all three referenced paths exist on disk; on failure the
/// stage returns an error instead and no artifact is produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformationArtifact {
    /// Whether the transformation completed.
    pub is_transformed: bool,
    /// Human-readable status message.
    pub message: String,
    /// Path to the transformed training array.
    pub transformed_train_path: PathBuf,
    /// Path to the transformed test array.
    pub transformed_test_path: PathBuf,
    /// Path to the persisted fitted-pipeline object.
    pub preprocessed_object_path: PathBuf,
}
