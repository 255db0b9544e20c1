//! Transformers and the fit/transform protocol.
//!
//! Every transformer in this stage implements [`Transform`]: `fit` learns
//! parameters from a frame (a no-op for stateless transformers), `transform`
//! applies them to produce a new frame. Transformers are pure with respect
//! to their input: the caller's frame is never mutated.

mod pipeline;
mod repair;
mod scaler;

pub use pipeline::{PipelineStage, PreprocessingPipeline, SequentialPipeline};
pub use repair::FeatureRepairer;
pub use scaler::StandardScaler;

use crate::error::Result;
use polars::prelude::DataFrame;

/// Two-phase fit/transform contract shared by all transformers.
///
/// Scaling statistics (and any other learned parameters) must only ever be
/// learned on the frame designated "train"; `transform` applies frozen
/// parameters and never updates them.
pub trait Transform {
    /// Learn parameters from `df`. Stateless transformers return `Ok(())`
    /// without looking at the frame.
    fn fit(&mut self, df: &DataFrame) -> Result<()>;

    /// Apply the transformer, producing a new frame. Requires a prior `fit`
    /// for stateful transformers.
    fn transform(&self, df: &DataFrame) -> Result<DataFrame>;

    /// Fit on `df` and immediately transform it.
    fn fit_transform(&mut self, df: &DataFrame) -> Result<DataFrame> {
        self.fit(df)?;
        self.transform(df)
    }
}
