//! Cleaning and transformation of the two raw tables.
//!
//! Catalog: row realignment, emoji stripping, numeric/date coercion,
//! aggregation of duplicates and unit normalization of size and price.
//! Reviews: emoji stripping, sentiment coercion and removal of empty reviews.

mod anomaly;
mod converters;
mod dedup;
mod sanitizers;

pub use anomaly::{apply_shift_rule, column_domain};
pub use converters::{parse_count, parse_date, parse_number, price_to_usd, size_to_kb};
pub use dedup::{aggregate_duplicates, duplicate_stats};
pub use sanitizers::{nullify_tokens, strip_emoji};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::schema::*;
use crate::types::{CatalogSummary, CoercionStat, ReviewSummary};
use crate::utils::{
    column, distinct_values, null_percentage, numeric_range, string_values, unique_count,
};
use converters::{count_column, date_column, float_column};
use polars::prelude::*;
use sanitizers::strip_emoji_column;
use std::collections::BTreeSet;
use tracing::{debug, info};

fn coercion_stat(df: &DataFrame, source: &str, target: &str, with_range: bool) -> Result<CoercionStat> {
    Ok(CoercionStat {
        source: source.to_string(),
        target: target.to_string(),
        missing_pct: null_percentage(df, target)?,
        range: if with_range {
            numeric_range(df, target)?
        } else {
            None
        },
    })
}

/// Data cleaner for the catalog and review tables.
pub struct DataCleaner;

impl DataCleaner {
    /// Clean the raw app catalog.
    ///
    /// Steps, in order:
    /// 1. Realign rows matched by the configured shift rules
    /// 2. Strip emoji from app names
    /// 3. `Rating` → `Rating Value`, `Last Updated` → date, `Reviews` → `Ratings Count`
    /// 4. Aggregate duplicate entries, summing `Ratings Count`
    /// 5. `Size` → `Size KB`, `Price` → `Price USD`
    pub fn clean_catalog(
        &self,
        df: DataFrame,
        config: &PipelineConfig,
    ) -> Result<(DataFrame, CatalogSummary)> {
        let mut df = df;
        info!("Cleaning app catalog ({} rows)...", df.height());

        let raw_categories = unique_count(&df, CATEGORY)?;

        // 1. Known misalignments
        let mut corrections = Vec::with_capacity(config.shift_rules.len());
        for rule in &config.shift_rules {
            corrections.push(apply_shift_rule(&mut df, rule)?);
        }

        // 2. Names
        let renamed = strip_emoji_column(&mut df, APP)?;
        debug!("Stripped emoji from {} app names", renamed);

        let unique_apps = unique_count(&df, APP)?;
        let unique_categories = unique_count(&df, CATEGORY)?;
        let types = distinct_values(&df, TYPE)?;
        let content_ratings = distinct_values(&df, CONTENT_RATING)?;
        let unique_genres = unique_count(&df, GENRES)?;
        let installs = distinct_values(&df, INSTALLS)?;

        // 3. Typed columns
        df.with_column(float_column(&df, RATING, RATING_VALUE, parse_number)?)?;
        let rating_value = coercion_stat(&df, RATING, RATING_VALUE, true)?;

        let last_updated_col = date_column(&df, LAST_UPDATED, LAST_UPDATED, &config.date_format)?;
        df.replace(LAST_UPDATED, last_updated_col)?;
        let last_updated = coercion_stat(&df, LAST_UPDATED, LAST_UPDATED, false)?;

        df.with_column(count_column(&df, REVIEWS, RATINGS_COUNT)?)?;
        let ratings_count = coercion_stat(&df, REVIEWS, RATINGS_COUNT, true)?;

        let df = df.drop_many([RATING, REVIEWS]);

        // 4. Duplicates
        let rows_before_dedup = df.height();
        let (mut grouped, incomplete_rows_dropped) =
            aggregate_duplicates(df.clone(), config.drop_incomplete_groups)?;
        let duplicates = duplicate_stats(&df, &grouped)?;
        let rows_after_dedup = grouped.height();
        info!(
            "Aggregated duplicates: {} -> {} rows",
            rows_before_dedup, rows_after_dedup
        );

        // 5. Units
        let sentinel = config.size_sentinel.as_str();
        grouped.with_column(float_column(&grouped, SIZE, SIZE_KB, |s| size_to_kb(s, sentinel))?)?;
        let size_kb = coercion_stat(&grouped, SIZE, SIZE_KB, true)?;

        grouped.with_column(float_column(&grouped, PRICE, PRICE_USD, price_to_usd)?)?;
        let price_usd = coercion_stat(&grouped, PRICE, PRICE_USD, true)?;

        let grouped = grouped.drop_many([PRICE]);

        let summary = CatalogSummary {
            raw_categories,
            corrections,
            unique_apps,
            unique_categories,
            types,
            content_ratings,
            unique_genres,
            installs,
            rating_value,
            last_updated,
            ratings_count,
            duplicates,
            incomplete_rows_dropped,
            rows_before_dedup,
            rows_after_dedup,
            size_kb,
            price_usd,
        };

        Ok((grouped, summary))
    }

    /// Clean the raw review table.
    ///
    /// Keeps `App`, `Sentiment`, `Sentiment Polar` and `Sentiment Subject`.
    /// Rows with no sentiment data are removed when
    /// [`PipelineConfig::drop_empty_reviews`] is set; their app names still
    /// appear in [`ReviewSummary::reviewed_apps`].
    pub fn clean_reviews(
        &self,
        df: DataFrame,
        config: &PipelineConfig,
    ) -> Result<(DataFrame, ReviewSummary)> {
        let mut df = df;
        let rows = df.height();
        info!("Cleaning reviews ({} rows)...", rows);

        let sentiments = distinct_values(&df, SENTIMENT)?;
        strip_emoji_column(&mut df, APP)?;
        let reviewed_apps: BTreeSet<String> =
            string_values(&df, APP)?.into_iter().flatten().collect();

        df.with_column(float_column(&df, SENTIMENT_POLARITY, SENTIMENT_POLAR, parse_number)?)?;
        let polarity = coercion_stat(&df, SENTIMENT_POLARITY, SENTIMENT_POLAR, true)?;

        df.with_column(float_column(
            &df,
            SENTIMENT_SUBJECTIVITY,
            SENTIMENT_SUBJECT,
            parse_number,
        )?)?;
        let subjectivity = coercion_stat(&df, SENTIMENT_SUBJECTIVITY, SENTIMENT_SUBJECT, true)?;

        let mut df = df
            .drop_many([TRANSLATED_REVIEW, SENTIMENT_POLARITY, SENTIMENT_SUBJECTIVITY])
            .select([APP, SENTIMENT, SENTIMENT_POLAR, SENTIMENT_SUBJECT])?;

        let mut empty_reviews_dropped = 0;
        if config.drop_empty_reviews {
            let mut has_review = BooleanChunked::full("has_review".into(), false, df.height());
            for field in SENTIMENT_FIELDS {
                has_review = &has_review | &column(&df, field)?.is_not_null();
            }
            df = df.filter(&has_review)?;
            empty_reviews_dropped = rows - df.height();
            debug!("Dropped {} reviews without sentiment data", empty_reviews_dropped);
        }

        let summary = ReviewSummary {
            rows,
            sentiments,
            polarity,
            subjectivity,
            empty_reviews_dropped,
            rows_after: df.height(),
            reviewed_apps,
        };

        Ok((df, summary))
    }
}
