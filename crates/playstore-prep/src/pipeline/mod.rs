//! Pipeline module.
//!
//! Orchestrates load, clean, merge, missing-data analysis and write.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
