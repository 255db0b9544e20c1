//! Frame loading and persistence helpers for the transformation stage.
//!
//! Input frames are column-delimited text with a header row and are
//! validated against the dataset schema on load. Transformed arrays are
//! persisted as Parquet.

use crate::error::{Result, ResultExt};
use crate::schema::DatasetSchema;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Load a CSV frame and check it carries every column the schema requires.
pub fn load_frame(path: impl AsRef<Path>, schema: &DatasetSchema) -> Result<DataFrame> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Opening {}", path.display()))?
        .finish()
        .context(format!("Reading {}", path.display()))?;

    schema
        .validate_frame(&df)
        .context(format!("Validating {} against schema", path.display()))?;

    debug!("Loaded frame {}: {:?}", path.display(), df.shape());
    Ok(df)
}

/// Write a frame as Parquet, creating parent directories as needed.
///
/// Callers that need all-or-none semantics across several files write to
/// temporary paths and rename after every write succeeded.
pub fn write_parquet(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Creating directory {}", parent.display()))?;
    }

    let file = File::create(path).context(format!("Creating {}", path.display()))?;
    ParquetWriter::new(file)
        .finish(df)
        .context(format!("Writing Parquet file {}", path.display()))?;
    Ok(())
}

/// Read back a persisted Parquet array.
pub fn read_parquet(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path).context(format!("Opening {}", path.display()))?;
    ParquetReader::new(file)
        .finish()
        .context(format!("Reading Parquet file {}", path.display()))
}
