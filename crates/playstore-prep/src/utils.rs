//! Shared column helpers used by the cleaning, merging and reporting stages.

use crate::error::{PrepError, Result};
use crate::types::ValueRange;
use polars::prelude::*;
use std::collections::HashSet;

/// Look up a column, mapping the polars error to [`PrepError::ColumnNotFound`].
pub fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| PrepError::ColumnNotFound(name.to_string()))
}

/// Fail with [`PrepError::MissingColumns`] unless every `required` column exists.
pub fn require_columns(df: &DataFrame, file: &str, required: &[&str]) -> Result<()> {
    let present: HashSet<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PrepError::MissingColumns {
            file: file.to_string(),
            columns: missing,
        })
    }
}

/// Owned string cells of a column. Non-string columns are cast first.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = column(df, name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Numeric cells of a column as `f64`.
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = column(df, name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Percentage (0-100) of null cells in a column. Zero for an empty frame.
pub fn null_percentage(df: &DataFrame, name: &str) -> Result<f64> {
    let col = column(df, name)?;
    if df.height() == 0 {
        return Ok(0.0);
    }
    Ok(col.null_count() as f64 * 100.0 / df.height() as f64)
}

/// Minimum and maximum of the non-null values, `None` when there are none.
pub fn numeric_range(df: &DataFrame, name: &str) -> Result<Option<ValueRange>> {
    let range = float_values(df, name)?
        .into_iter()
        .flatten()
        .fold(None, |acc: Option<ValueRange>, v| match acc {
            None => Some(ValueRange { min: v, max: v }),
            Some(r) => Some(ValueRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        });
    Ok(range)
}

/// Distinct cell values in order of first appearance; null counts as a value.
pub fn distinct_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for value in string_values(df, name)? {
        if seen.insert(value.clone()) {
            distinct.push(value);
        }
    }
    Ok(distinct)
}

/// Number of distinct cell values; null counts as a value.
pub fn unique_count(df: &DataFrame, name: &str) -> Result<usize> {
    Ok(string_values(df, name)?
        .into_iter()
        .collect::<HashSet<_>>()
        .len())
}

/// Render a list of optional values the way the diagnostics print them.
pub fn format_values(values: &[Option<String>]) -> String {
    let rendered: Vec<String> = values
        .iter()
        .map(|v| match v {
            Some(s) => format!("'{}'", s),
            None => "null".to_string(),
        })
        .collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "Type" => [Some("Free"), Some("Paid"), None, Some("Free")],
            "Rating Value" => [Some(4.1), None, Some(3.9), Some(4.7)]
        )
        .unwrap()
    }

    #[test]
    fn test_require_columns_reports_all_missing() {
        let df = sample();
        assert!(require_columns(&df, "apps.csv", &["Type"]).is_ok());

        let err = require_columns(&df, "apps.csv", &["Type", "App", "Genres"]).unwrap_err();
        match err {
            PrepError::MissingColumns { file, columns } => {
                assert_eq!(file, "apps.csv");
                assert_eq!(columns, vec!["App".to_string(), "Genres".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_column_not_found() {
        let df = sample();
        let err = column(&df, "Nope").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }

    #[test]
    fn test_null_percentage() {
        let df = sample();
        assert_eq!(null_percentage(&df, "Type").unwrap(), 25.0);
        assert_eq!(null_percentage(&df, "Rating Value").unwrap(), 25.0);
    }

    #[test]
    fn test_numeric_range_skips_nulls() {
        let df = sample();
        let range = numeric_range(&df, "Rating Value").unwrap().unwrap();
        assert_eq!(range.min, 3.9);
        assert_eq!(range.max, 4.7);
    }

    #[test]
    fn test_numeric_range_all_null() {
        let df = df!("x" => [None::<f64>, None]).unwrap();
        assert!(numeric_range(&df, "x").unwrap().is_none());
    }

    #[test]
    fn test_distinct_values_keep_first_appearance() {
        let df = sample();
        let values = distinct_values(&df, "Type").unwrap();
        assert_eq!(
            values,
            vec![Some("Free".to_string()), Some("Paid".to_string()), None]
        );
        assert_eq!(unique_count(&df, "Type").unwrap(), 3);
        assert_eq!(format_values(&values), "['Free', 'Paid', null]");
    }
}
