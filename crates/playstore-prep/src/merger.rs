//! Joining the cleaned catalog with its reviews into the fact table.

use crate::error::Result;
use crate::schema::{APP, APP_ID, FINAL_COLUMNS};
use crate::types::MergeSummary;
use crate::utils::string_values;
use polars::prelude::*;
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};

const CATALOG_ROW: &str = "__catalog_row";
const REVIEW_ROW: &str = "__review_row";

/// Dense 1-based ids over the distinct non-null values of `names`, in
/// lexicographic order.
fn assign_ids(names: &[Option<String>]) -> Vec<Option<u32>> {
    let ordered: Vec<&str> = names
        .iter()
        .flatten()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    names
        .iter()
        .map(|name| {
            name.as_deref()
                .and_then(|n| ordered.binary_search(&n).ok())
                .map(|pos| pos as u32 + 1)
        })
        .collect()
}

/// Left-join `catalog` with `reviews` on the app name.
///
/// Every catalog row is kept; an app with several reviews yields one row per
/// review, in review order. Reviews of apps missing from the catalog are
/// dropped. The result has exactly the fact-table columns, ordered by
/// `App_id`.
///
/// `reviewed_apps` holds every app name seen in the review file, including
/// apps whose reviews were all empty; names absent from the catalog are
/// counted as unmatched.
pub fn merge(
    catalog: &DataFrame,
    reviews: &DataFrame,
    reviewed_apps: &BTreeSet<String>,
) -> Result<(DataFrame, MergeSummary)> {
    let catalog_names = string_values(catalog, APP)?;
    let known: HashSet<&str> = catalog_names.iter().flatten().map(String::as_str).collect();
    let unmatched_review_apps = reviewed_apps
        .iter()
        .filter(|name| !known.contains(name.as_str()))
        .count();
    if unmatched_review_apps > 0 {
        warn!(
            "{} reviewed app(s) have no catalog entry, their reviews are dropped",
            unmatched_review_apps
        );
    }

    let mut catalog = catalog.with_row_index(CATALOG_ROW.into(), None)?;
    catalog.with_column(Series::new(APP_ID.into(), assign_ids(&catalog_names)))?;
    let reviews = reviews.with_row_index(REVIEW_ROW.into(), None)?;

    let joined = catalog
        .lazy()
        .join(
            reviews.lazy(),
            [col(APP)],
            [col(APP)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    let merged = joined
        .sort(
            [APP_ID, CATALOG_ROW, REVIEW_ROW],
            SortMultipleOptions::default()
                .with_nulls_last(true)
                .with_maintain_order(true),
        )?
        .select(FINAL_COLUMNS)?;

    let summary = MergeSummary {
        unmatched_review_apps,
        rows: merged.height(),
        apps: known.len(),
        columns: FINAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
    };
    info!(
        "Merged table: {} rows x {} columns",
        merged.height(),
        merged.width()
    );

    Ok((merged, summary))
}
