//! Stage summaries and the run report assembled from them.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Closed range of the non-null values of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Outcome of coercing one string column into a typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoercionStat {
    pub source: String,
    pub target: String,
    /// Share of the target column left null, 0-100.
    pub missing_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
}

/// Rows realigned by one shift rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyCorrection {
    pub column: String,
    pub sentinel: String,
    pub rows_corrected: usize,
}

/// How often app names repeat in the raw catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateStats {
    /// Names appearing on more than one row.
    pub duplicated_names: usize,
    /// The most repeated name and its row count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_duplicated: Option<(String, usize)>,
    /// Distinct key combinations of the most repeated name.
    pub most_duplicated_variants: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSummary {
    pub catalog_file: String,
    pub catalog_rows: usize,
    pub reviews_file: String,
    pub review_rows: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSummary {
    pub raw_categories: usize,
    pub corrections: Vec<AnomalyCorrection>,
    pub unique_apps: usize,
    pub unique_categories: usize,
    pub types: Vec<Option<String>>,
    pub content_ratings: Vec<Option<String>>,
    pub unique_genres: usize,
    pub installs: Vec<Option<String>>,
    pub rating_value: CoercionStat,
    pub last_updated: CoercionStat,
    pub ratings_count: CoercionStat,
    pub duplicates: DuplicateStats,
    pub incomplete_rows_dropped: usize,
    pub rows_before_dedup: usize,
    pub rows_after_dedup: usize,
    pub size_kb: CoercionStat,
    pub price_usd: CoercionStat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub rows: usize,
    pub sentiments: Vec<Option<String>>,
    pub polarity: CoercionStat,
    pub subjectivity: CoercionStat,
    pub empty_reviews_dropped: usize,
    pub rows_after: usize,
    /// Cleaned app names over every review row, empty ones included.
    #[serde(skip)]
    pub reviewed_apps: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSummary {
    /// Review apps with no catalog entry; their reviews are left out.
    pub unmatched_review_apps: usize,
    pub rows: usize,
    pub apps: usize,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing_pct: f64,
}

/// Profile of the rows without any review data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoReviewSummary {
    pub rows: usize,
    pub apps: usize,
    pub categories: usize,
    pub types: Vec<Option<String>>,
    pub content_ratings: Vec<Option<String>>,
    pub installs: Vec<Option<String>>,
    pub rating_value: Option<ValueRange>,
    pub ratings_count: Option<ValueRange>,
    pub size_kb: Option<ValueRange>,
    pub price_usd: Option<ValueRange>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingDataReport {
    pub rows: usize,
    /// Columns with at least one null, in table order.
    pub columns: Vec<ColumnMissing>,
    pub no_review: NoReviewSummary,
}

/// Everything the pipeline learned during one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub generated_at: String,
    pub duration_ms: u64,
    pub load: LoadSummary,
    pub catalog: CatalogSummary,
    pub reviews: ReviewSummary,
    pub merge: MergeSummary,
    pub missing: MissingDataReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

/// The fact table together with the run report.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub data: DataFrame,
    pub report: RunReport,
}
