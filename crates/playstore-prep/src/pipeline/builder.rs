//! The preparation pipeline and its builder.

use crate::cleaner::DataCleaner;
use crate::config::{ConfigValidationError, PipelineConfig};
use crate::error::Result;
use crate::loader::{load_catalog, load_reviews};
use crate::merger::merge;
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::quality::MissingDataAnalyzer;
use crate::types::{LoadSummary, PipelineResult, RunReport};
use crate::writer::{report_path_for, write_csv, write_report};
use chrono::Local;
use polars::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The catalog/review preparation pipeline.
///
/// ```rust,ignore
/// use playstore_prep::{Pipeline, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .output_path("out/fact.csv")
///     .build()?;
///
/// let result = Pipeline::builder().config(config).build()?.run()?;
/// println!("{}", result.report.merge);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    cleaner: DataCleaner,
}

static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load both input files, transform them and, unless disabled, write
    /// the fact table to the configured output path.
    pub fn run(&self) -> Result<PipelineResult> {
        let outcome = self.run_internal();
        self.finish(outcome)
    }

    /// Transform already-loaded tables. Nothing is written.
    pub fn process(&self, catalog: DataFrame, reviews: DataFrame) -> Result<PipelineResult> {
        let outcome = self.process_internal(catalog, reviews, Instant::now());
        self.finish(outcome)
    }

    fn finish(&self, outcome: Result<PipelineResult>) -> Result<PipelineResult> {
        match outcome {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self) -> Result<PipelineResult> {
        let start_time = Instant::now();

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.0,
            "Loading datasets...",
        ));
        let catalog = load_catalog(&self.config)?;
        self.report_progress(ProgressUpdate::new(
            PipelineStage::Loading,
            0.5,
            "Catalog loaded",
        ));
        let reviews = load_reviews(&self.config)?;

        let mut result = self.process_internal(catalog, reviews, start_time)?;

        if self.config.write_output {
            self.report_progress(ProgressUpdate::new(
                PipelineStage::Writing,
                0.0,
                "Writing fact table...",
            ));
            let path = write_csv(&mut result.data, &self.config.output_path)?;
            result.report.output_file = Some(path.display().to_string());
            result.report.duration_ms = start_time.elapsed().as_millis() as u64;
        }

        Ok(result)
    }

    fn process_internal(
        &self,
        catalog: DataFrame,
        reviews: DataFrame,
        start_time: Instant,
    ) -> Result<PipelineResult> {
        let load = LoadSummary {
            catalog_file: self.config.catalog_path.display().to_string(),
            catalog_rows: catalog.height(),
            reviews_file: self.config.reviews_path.display().to_string(),
            review_rows: reviews.height(),
        };

        self.report_progress(ProgressUpdate::new(
            PipelineStage::CatalogCleaning,
            0.0,
            "Cleaning app catalog...",
        ));
        let (catalog, catalog_summary) = self.cleaner.clean_catalog(catalog, &self.config)?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::ReviewCleaning,
            0.0,
            "Cleaning reviews...",
        ));
        let (reviews, review_summary) = self.cleaner.clean_reviews(reviews, &self.config)?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::Merging,
            0.0,
            "Merging datasets...",
        ));
        let (data, merge_summary) =
            merge(&catalog, &reviews, &review_summary.reviewed_apps)?;

        self.report_progress(ProgressUpdate::new(
            PipelineStage::MissingDataAnalysis,
            0.0,
            "Analyzing missing data...",
        ));
        let missing = MissingDataAnalyzer::analyze(&data)?;

        info!(
            "Pipeline produced {} rows in {} ms",
            data.height(),
            start_time.elapsed().as_millis()
        );

        let report = RunReport {
            generated_at: Local::now().to_rfc3339(),
            duration_ms: start_time.elapsed().as_millis() as u64,
            load,
            catalog: catalog_summary,
            reviews: review_summary,
            merge: merge_summary,
            missing,
            output_file: None,
        };

        Ok(PipelineResult { data, report })
    }

    /// Write the JSON report next to the configured output file.
    pub fn emit_report(&self, report: &RunReport) -> Result<std::path::PathBuf> {
        write_report(report, &report_path_for(&self.config.output_path))
    }
}

#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PipelineConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline. Fails if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
            cleaner: DataCleaner,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;
    use std::sync::Mutex;

    fn catalog() -> DataFrame {
        df!(
            APP => ["ROBLOX", "ROBLOX", "Photo Editor"],
            CATEGORY => ["GAME", "GAME", "ART_AND_DESIGN"],
            RATING => ["4.5", "4.5", "4.1"],
            REVIEWS => ["4447388", "4447346", "159"],
            SIZE => ["67M", "67M", "19M"],
            INSTALLS => ["100,000,000+", "100,000,000+", "10,000+"],
            TYPE => ["Free", "Free", "Free"],
            PRICE => ["0", "0", "0"],
            CONTENT_RATING => ["Everyone 10+", "Everyone 10+", "Everyone"],
            GENRES => ["Adventure", "Adventure", "Art & Design"],
            LAST_UPDATED => ["July 31, 2018", "July 31, 2018", "January 7, 2018"],
            CURRENT_VER => ["2.347.225742", "2.347.225742", "1.0.0"],
            ANDROID_VER => ["4.1 and up", "4.1 and up", "4.0.3 and up"]
        )
        .unwrap()
    }

    fn reviews() -> DataFrame {
        df!(
            APP => ["ROBLOX"],
            TRANSLATED_REVIEW => ["Love it"],
            SENTIMENT => ["Positive"],
            SENTIMENT_POLARITY => ["0.5"],
            SENTIMENT_SUBJECTIVITY => ["0.6"]
        )
        .unwrap()
    }

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert_eq!(pipeline.config().size_sentinel, "Varies with device");
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_config() {
        let mut config = PipelineConfig::default();
        config.date_format = String::new();
        assert!(Pipeline::builder().config(config).build().is_err());
    }

    #[test]
    fn test_process_in_memory() {
        let pipeline = Pipeline::builder().build().unwrap();
        let result = pipeline.process(catalog(), reviews()).unwrap();

        assert_eq!(result.data.width(), 18);
        assert_eq!(result.data.height(), 2);
        assert_eq!(result.report.catalog.rows_after_dedup, 2);
        assert!(result.report.output_file.is_none());
    }

    #[test]
    fn test_progress_stages_in_order() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = stages.clone();

        let pipeline = Pipeline::builder()
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap();
        pipeline.process(catalog(), reviews()).unwrap();

        let seen = stages.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                PipelineStage::CatalogCleaning,
                PipelineStage::ReviewCleaning,
                PipelineStage::Merging,
                PipelineStage::MissingDataAnalysis,
                PipelineStage::Complete,
            ]
        );
    }

    #[test]
    fn test_failure_is_reported() {
        let stages = Arc::new(Mutex::new(Vec::new()));
        let sink = stages.clone();

        let pipeline = Pipeline::builder()
            .on_progress(move |update| sink.lock().unwrap().push(update.stage))
            .build()
            .unwrap();
        let broken = catalog().drop(CATEGORY).unwrap();
        assert!(pipeline.process(broken, reviews()).is_err());

        assert_eq!(stages.lock().unwrap().last(), Some(&PipelineStage::Failed));
    }
}
