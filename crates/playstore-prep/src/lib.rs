//! Play Store Data Preparation Library
//!
//! Turns the public Google Play Store app catalog and its user-review file
//! into one analysis-ready fact table, built with Rust and Polars.
//!
//! # Overview
//!
//! - **Loading**: both CSV files are read with every column as a string
//! - **Catalog cleaning**: realignment of misaligned rows, emoji stripping,
//!   numeric and date coercion, aggregation of duplicate entries, size and
//!   price normalization
//! - **Review cleaning**: emoji stripping and sentiment coercion
//! - **Merging**: left join on the app name with a dense `App_id`
//! - **Missing-data report**: per-column null shares and a profile of apps
//!   without reviews
//! - **Writing**: `data/prep_fact_data.csv` plus an optional JSON run report
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use playstore_prep::{Pipeline, PipelineConfig};
//!
//! // Fixed default paths
//! let result = Pipeline::builder().build()?.run()?;
//! println!("{}", result.report);
//!
//! // Custom paths, progress callback
//! let config = PipelineConfig::builder()
//!     .catalog_path("raw/apps.csv")
//!     .reviews_path("raw/reviews.csv")
//!     .output_path("out/fact.csv")
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?
//!     .run()?;
//! ```
//!
//! # Configuration
//!
//! The one known misaligned catalog row and the `Varies with device` size
//! marker are configuration, not code:
//!
//! ```rust,ignore
//! use playstore_prep::config::*;
//!
//! let config = PipelineConfig::builder()
//!     .shift_rules(vec![ShiftRule::new("Category", "1.9")])
//!     .size_sentinel("Varies with device")
//!     .drop_incomplete_groups(false)
//!     .build()?;
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod loader;
pub mod merger;
pub mod pipeline;
pub mod quality;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;
pub mod writer;

pub use cleaner::{DataCleaner, strip_emoji};
pub use config::{ConfigValidationError, PipelineConfig, PipelineConfigBuilder, ShiftRule};
pub use error::{PrepError, Result, ResultExt};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PipelineStage, ProgressReporter,
    ProgressUpdate,
};
pub use quality::MissingDataAnalyzer;
pub use types::*;
