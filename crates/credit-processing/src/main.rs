//! CLI entry point for the data transformation stage.

use anyhow::{anyhow, Result};
use clap::Parser;
use credit_processing::{
    DataTransformation, IngestionArtifact, TransformationArtifact, TransformationConfig,
    ValidationArtifact,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Credit-default data transformation stage",
    long_about = "Applies the feature-repair and scaling pipeline to the ingested\n\
                  train/test frames and persists the transformed arrays plus the\n\
                  fitted pipeline object.\n\n\
                  EXAMPLES:\n  \
                  # Transform with default output layout\n  \
                  credit-processing --schema config/schema.yaml \\\n      \
                  --train artifacts/ingested/train/credit.csv \\\n      \
                  --test artifacts/ingested/test/credit.csv\n\n  \
                  # Custom output directory, JSON artifact on stdout\n  \
                  credit-processing --schema config/schema.yaml \\\n      \
                  --train train.csv --test test.csv -o out/ --json"
)]
struct Args {
    /// Path to the validated schema YAML document
    #[arg(long)]
    schema: PathBuf,

    /// Path to the ingested training CSV
    #[arg(long)]
    train: PathBuf,

    /// Path to the ingested test CSV
    #[arg(long)]
    test: PathBuf,

    /// Base output directory for stage artifacts
    #[arg(short, long, default_value = "./artifacts")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and the final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output the transformation artifact as JSON on stdout
    ///
    /// Disables all progress logs; useful for piping to other tools.
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    for (label, path) in [
        ("schema", &args.schema),
        ("train", &args.train),
        ("test", &args.test),
    ] {
        if !path.exists() {
            return Err(anyhow!("{} file not found: {}", label, path.display()));
        }
    }

    let config = TransformationConfig::builder()
        .transformed_train_dir(args.output.join("transformed/train"))
        .transformed_test_dir(args.output.join("transformed/test"))
        .preprocessed_object_path(args.output.join("preprocessed/pipeline.json"))
        .build()?;

    let stage = DataTransformation::new(
        config,
        IngestionArtifact {
            train_path: args.train.clone(),
            test_path: args.test.clone(),
        },
        ValidationArtifact {
            schema_path: args.schema.clone(),
        },
    );

    info!("Starting transformation stage");
    match stage.run() {
        Ok(artifact) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&artifact)?);
            } else {
                print_summary(&artifact);
            }
            Ok(())
        }
        Err(e) => {
            error!("Transformation failed: {}", e);
            Err(anyhow!("Transformation failed: {}", e))
        }
    }
}

/// Print a human-readable summary of the stage outputs.
///
/// Uses `println!` intentionally for user-facing CLI output; unlike logging
/// this should always be visible regardless of log level settings.
fn print_summary(artifact: &TransformationArtifact) {
    println!();
    println!("{}", "=".repeat(80));
    println!("TRANSFORMATION COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!("  {}", artifact.message);
    println!();
    println!(
        "  Train array:     {}",
        artifact.transformed_train_path.display()
    );
    println!(
        "  Test array:      {}",
        artifact.transformed_test_path.display()
    );
    println!(
        "  Fitted pipeline: {}",
        artifact.preprocessed_object_path.display()
    );
    println!();
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
