//! Collapsing repeated catalog entries.
//!
//! The catalog lists some apps several times with identical attributes and
//! slightly different review counts (snapshots taken at different moments).
//! Such rows are grouped on every descriptive attribute and their ratings
//! counts summed. An app listed under two categories stays two rows.

use crate::error::Result;
use crate::schema::{APP, DEDUP_KEYS, RATINGS_COUNT};
use crate::types::DuplicateStats;
use crate::utils::{column, string_values};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Group `df` on [`DEDUP_KEYS`], summing [`RATINGS_COUNT`].
///
/// Null key values form their own group unless `drop_incomplete` is set, in
/// which case rows with any null key are removed first. Returns the grouped
/// frame, ordered by app name (ties keep first-appearance order), and the
/// number of rows dropped as incomplete.
pub fn aggregate_duplicates(df: DataFrame, drop_incomplete: bool) -> Result<(DataFrame, usize)> {
    let mut df = df;
    let mut dropped = 0;

    if drop_incomplete {
        let before = df.height();
        let mut mask = BooleanChunked::full("complete".into(), true, before);
        for key in DEDUP_KEYS {
            mask = &mask & &column(&df, key)?.is_not_null();
        }
        df = df.filter(&mask)?;
        dropped = before - df.height();
        debug!("Dropped {} rows with incomplete grouping keys", dropped);
    }

    let keys: Vec<Expr> = DEDUP_KEYS.iter().map(|k| col(*k)).collect();
    let grouped = df
        .lazy()
        .group_by_stable(keys)
        .agg([col(RATINGS_COUNT).sum()])
        .collect()?;

    let grouped = grouped.sort(
        [APP],
        SortMultipleOptions::default().with_maintain_order(true),
    )?;

    Ok((grouped, dropped))
}

/// Repetition statistics of app names, comparing the frame before and after
/// [`aggregate_duplicates`].
pub fn duplicate_stats(raw: &DataFrame, grouped: &DataFrame) -> Result<DuplicateStats> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for name in string_values(raw, APP)?.into_iter().flatten() {
        *counts.entry(name).or_insert(0) += 1;
    }

    let duplicated_names = counts.values().filter(|c| **c > 1).count();
    let most_duplicated = counts
        .into_iter()
        .filter(|(_, c)| *c > 1)
        .max_by(|(name_a, a), (name_b, b)| a.cmp(b).then_with(|| name_b.cmp(name_a)));

    let most_duplicated_variants = match &most_duplicated {
        Some((name, _)) => string_values(grouped, APP)?
            .iter()
            .filter(|v| v.as_deref() == Some(name.as_str()))
            .count(),
        None => 0,
    };

    Ok(DuplicateStats {
        duplicated_names,
        most_duplicated,
        most_duplicated_variants,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::*;

    fn catalog(rows: &[(&str, &str, Option<f64>, i64)]) -> DataFrame {
        let n = rows.len();
        df!(
            APP => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
            CATEGORY => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
            RATING_VALUE => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
            SIZE => vec!["67M"; n],
            INSTALLS => vec!["100,000,000+"; n],
            TYPE => vec!["Free"; n],
            PRICE => vec!["0"; n],
            CONTENT_RATING => vec!["Everyone 10+"; n],
            GENRES => vec!["Adventure"; n],
            LAST_UPDATED => vec!["July 31, 2018"; n],
            CURRENT_VER => vec!["2.347.225742"; n],
            ANDROID_VER => vec!["4.1 and up"; n],
            RATINGS_COUNT => rows.iter().map(|r| r.3).collect::<Vec<_>>()
        )
        .unwrap()
    }

    #[test]
    fn test_duplicates_are_summed() {
        let df = catalog(&[
            ("ROBLOX", "GAME", Some(4.5), 4_447_388),
            ("ROBLOX", "GAME", Some(4.5), 4_447_346),
            ("ROBLOX", "FAMILY", Some(4.5), 4_449_910),
            ("Candy Crush", "GAME", Some(4.4), 100),
        ]);

        let (grouped, dropped) = aggregate_duplicates(df, false).unwrap();
        assert_eq!(dropped, 0);
        assert_eq!(grouped.height(), 3);

        let apps = string_values(&grouped, APP).unwrap();
        assert_eq!(apps[0].as_deref(), Some("Candy Crush"));

        let counts: Vec<Option<i64>> = grouped
            .column(RATINGS_COUNT)
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(counts, vec![Some(100), Some(8_894_734), Some(4_449_910)]);
    }

    #[test]
    fn test_total_count_preserved() {
        let df = catalog(&[
            ("A", "TOOLS", Some(4.0), 10),
            ("A", "TOOLS", Some(4.0), 15),
            ("B", "TOOLS", None, 7),
            ("B", "TOOLS", None, 3),
        ]);
        let before: i64 = df.column(RATINGS_COUNT).unwrap().as_materialized_series().i64().unwrap().sum().unwrap();

        let (grouped, _) = aggregate_duplicates(df, false).unwrap();
        let after: i64 = grouped.column(RATINGS_COUNT).unwrap().as_materialized_series().i64().unwrap().sum().unwrap();

        assert_eq!(grouped.height(), 2);
        assert_eq!(before, after);
    }

    #[test]
    fn test_drop_incomplete_groups() {
        let df = catalog(&[("A", "TOOLS", Some(4.0), 10), ("B", "TOOLS", None, 7)]);

        let (grouped, dropped) = aggregate_duplicates(df, true).unwrap();
        assert_eq!(dropped, 1);
        assert_eq!(grouped.height(), 1);
    }

    #[test]
    fn test_duplicate_stats() {
        let raw = catalog(&[
            ("ROBLOX", "GAME", Some(4.5), 1),
            ("ROBLOX", "GAME", Some(4.5), 2),
            ("ROBLOX", "FAMILY", Some(4.5), 3),
            ("Zoom", "BUSINESS", Some(4.0), 1),
            ("Zoom", "BUSINESS", Some(4.0), 1),
            ("Solo", "TOOLS", Some(3.0), 1),
        ]);
        let (grouped, _) = aggregate_duplicates(raw.clone(), false).unwrap();

        let stats = duplicate_stats(&raw, &grouped).unwrap();
        assert_eq!(stats.duplicated_names, 2);
        assert_eq!(stats.most_duplicated, Some(("ROBLOX".to_string(), 3)));
        assert_eq!(stats.most_duplicated_variants, 2);
    }
}
