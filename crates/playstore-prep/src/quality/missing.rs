//! Missing-data analysis of the merged fact table.
//!
//! Reports the null share of every column and profiles the rows of apps that
//! have no review data.

use crate::error::Result;
use crate::schema::*;
use crate::types::{ColumnMissing, MissingDataReport, NoReviewSummary};
use crate::utils::{column, distinct_values, null_percentage, numeric_range, unique_count};
use polars::prelude::*;
use tracing::info;

pub struct MissingDataAnalyzer;

impl MissingDataAnalyzer {
    /// Null percentages per column and a profile of the unreviewed rows.
    pub fn analyze(df: &DataFrame) -> Result<MissingDataReport> {
        let mut columns = Vec::new();
        for name in df.get_column_names() {
            let missing_pct = null_percentage(df, name)?;
            if missing_pct > 0.0 {
                columns.push(ColumnMissing {
                    column: name.to_string(),
                    missing_pct,
                });
            }
        }

        let no_review = Self::summarize_no_review(df)?;
        info!(
            "{} of {} columns have missing data; {} rows without reviews",
            columns.len(),
            df.width(),
            no_review.rows
        );

        Ok(MissingDataReport {
            rows: df.height(),
            columns,
            no_review,
        })
    }

    fn summarize_no_review(df: &DataFrame) -> Result<NoReviewSummary> {
        let mut mask = BooleanChunked::full("no_review".into(), true, df.height());
        for field in SENTIMENT_FIELDS {
            mask = &mask & &column(df, field)?.is_null();
        }
        let subset = df.filter(&mask)?;

        Ok(NoReviewSummary {
            rows: subset.height(),
            apps: unique_count(&subset, APP)?,
            categories: unique_count(&subset, CATEGORY)?,
            types: distinct_values(&subset, TYPE)?,
            content_ratings: distinct_values(&subset, CONTENT_RATING)?,
            installs: distinct_values(&subset, INSTALLS)?,
            rating_value: numeric_range(&subset, RATING_VALUE)?,
            ratings_count: numeric_range(&subset, RATINGS_COUNT)?,
            size_kb: numeric_range(&subset, SIZE_KB)?,
            price_usd: numeric_range(&subset, PRICE_USD)?,
        })
    }
}
