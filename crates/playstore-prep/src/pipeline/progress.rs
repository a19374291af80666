//! Progress reporting for the preparation pipeline.
//!
//! ```rust,ignore
//! use playstore_prep::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:?}] {}", update.stage, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```

use serde::{Deserialize, Serialize};

/// Stages of one pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Reading both input files
    Loading,
    /// Realignment, coercion, aggregation and unit conversion of the catalog
    CatalogCleaning,
    /// Emoji stripping and sentiment coercion of the reviews
    ReviewCleaning,
    /// Joining catalog and reviews, assigning app ids
    Merging,
    /// Computing the missing-data report
    MissingDataAnalysis,
    /// Writing the fact table
    Writing,
    /// Pipeline completed successfully
    Complete,
    /// Pipeline failed with an error
    Failed,
}

impl PipelineStage {
    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Loading => "Loading Datasets",
            Self::CatalogCleaning => "Cleaning Catalog",
            Self::ReviewCleaning => "Cleaning Reviews",
            Self::Merging => "Merging Datasets",
            Self::MissingDataAnalysis => "Analyzing Missing Data",
            Self::Writing => "Writing Output",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
        }
    }

    /// Share of the whole run spent in this stage (0.0 - 1.0).
    pub fn weight(&self) -> f32 {
        match self {
            Self::Loading => 0.15,
            Self::CatalogCleaning => 0.35,
            Self::ReviewCleaning => 0.15,
            Self::Merging => 0.15,
            Self::MissingDataAnalysis => 0.05,
            Self::Writing => 0.15,
            Self::Complete | Self::Failed => 0.0,
        }
    }

    /// Cumulative progress at the start of this stage.
    pub fn base_progress(&self) -> f32 {
        match self {
            Self::Loading => 0.0,
            Self::CatalogCleaning => 0.15,
            Self::ReviewCleaning => 0.50,
            Self::Merging => 0.65,
            Self::MissingDataAnalysis => 0.80,
            Self::Writing => 0.85,
            Self::Complete => 1.0,
            Self::Failed => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Progress within current stage (0.0 - 1.0)
    pub stage_progress: f32,

    pub message: String,
}

impl ProgressUpdate {
    pub fn new(stage: PipelineStage, stage_progress: f32, message: impl Into<String>) -> Self {
        let progress = stage.base_progress() + (stage.weight() * stage_progress);
        Self {
            stage,
            progress: progress.clamp(0.0, 1.0),
            stage_progress: stage_progress.clamp(0.0, 1.0),
            message: message.into(),
        }
    }

    pub fn complete(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Complete,
            progress: 1.0,
            stage_progress: 1.0,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stage: PipelineStage::Failed,
            progress: 0.0,
            stage_progress: 0.0,
            message: message.into(),
        }
    }
}

/// Receiver of progress updates.
///
/// Implementations must be `Send + Sync` so a pipeline carrying one can be
/// moved to a worker thread.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: ProgressUpdate);
}

/// [`ProgressReporter`] backed by a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const RUN_STAGES: [PipelineStage; 6] = [
        PipelineStage::Loading,
        PipelineStage::CatalogCleaning,
        PipelineStage::ReviewCleaning,
        PipelineStage::Merging,
        PipelineStage::MissingDataAnalysis,
        PipelineStage::Writing,
    ];

    #[test]
    fn test_progress_update_new() {
        let update = ProgressUpdate::new(PipelineStage::CatalogCleaning, 0.5, "Cleaning...");
        assert_eq!(update.stage, PipelineStage::CatalogCleaning);
        assert_eq!(update.stage_progress, 0.5);
        assert!((update.progress - 0.325).abs() < 1e-6);
    }

    #[test]
    fn test_stage_weights_sum() {
        let total: f32 = RUN_STAGES.iter().map(|s| s.weight()).sum();
        assert!((total - 1.0).abs() < 0.01, "Weights should sum to ~1.0");
    }

    #[test]
    fn test_base_progress_is_cumulative() {
        let mut expected = 0.0;
        for stage in RUN_STAGES {
            assert!((stage.base_progress() - expected).abs() < 1e-6, "{stage:?}");
            expected += stage.weight();
        }
    }

    #[test]
    fn test_closure_progress_reporter() {
        let call_count = Arc::new(AtomicUsize::new(0));
        let call_count_clone = call_count.clone();

        let reporter = ClosureProgressReporter::new(move |_update| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
        });

        reporter.report(ProgressUpdate::new(PipelineStage::Loading, 0.0, "Test"));
        reporter.report(ProgressUpdate::complete("Done"));

        assert_eq!(call_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stage_json_values() {
        let stage_expectations = [
            (PipelineStage::Loading, "\"loading\""),
            (PipelineStage::CatalogCleaning, "\"catalog_cleaning\""),
            (PipelineStage::MissingDataAnalysis, "\"missing_data_analysis\""),
            (PipelineStage::Failed, "\"failed\""),
        ];

        for (stage, expected_json) in stage_expectations {
            let json = serde_json::to_string(&stage).expect("Should serialize");
            assert_eq!(json, expected_json);
        }
    }
}
