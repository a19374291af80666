//! Data quality analysis module.
//!
//! Reports how much of the merged fact table is missing and profiles the
//! apps that have no review data.

mod missing;

pub use missing::MissingDataAnalyzer;
