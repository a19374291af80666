//! String-to-typed conversions for catalog and review columns.
//!
//! Every parser returns `None` for text it cannot read. A conversion never
//! fails because of cell contents.

use crate::error::Result;
use crate::utils::string_values;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Parse a plain decimal number. Blank, `NaN` and infinite values are missing.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a whole count. Accepts integral decimals like `159.0`; rejects
/// suffixed text like `3.0M`.
pub fn parse_count(text: &str) -> Option<i64> {
    let trimmed = text.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Some(v);
    }
    parse_number(trimmed)
        .filter(|v| v.fract() == 0.0 && *v >= i64::MIN as f64 && *v <= i64::MAX as f64)
        .map(|v| v as i64)
}

/// Parse a date with a chrono format string such as `%B %d, %Y`.
pub fn parse_date(text: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), format).ok()
}

/// Convert a mixed-unit size (`19M`, `512k`) to kilobytes.
///
/// An `M` marks megabytes (×1024), a `k` kilobytes; the sentinel and any text
/// carrying neither unit are missing.
pub fn size_to_kb(text: &str, sentinel: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed == sentinel {
        return None;
    }
    let number = parse_number(&trimmed.replace(['k', 'M'], ""))?;
    if trimmed.contains('M') {
        Some(number * 1024.0)
    } else if trimmed.contains('k') {
        Some(number)
    } else {
        None
    }
}

/// Convert a dollar price (`$4.99`, `0`) to a number.
pub fn price_to_usd(text: &str) -> Option<f64> {
    parse_number(&text.replace('$', ""))
}

fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - EPOCH_DAYS_FROM_CE
}

/// Map the string cells of `source` through `parse` into a new Float64 column.
pub(crate) fn float_column<F>(df: &DataFrame, source: &str, target: &str, parse: F) -> Result<Series>
where
    F: Fn(&str) -> Option<f64>,
{
    let values: Vec<Option<f64>> = string_values(df, source)?
        .iter()
        .map(|v| v.as_deref().and_then(&parse))
        .collect();
    Ok(Series::new(target.into(), values))
}

/// Int64 column of counts parsed from `source`.
pub(crate) fn count_column(df: &DataFrame, source: &str, target: &str) -> Result<Series> {
    let values: Vec<Option<i64>> = string_values(df, source)?
        .iter()
        .map(|v| v.as_deref().and_then(parse_count))
        .collect();
    Ok(Series::new(target.into(), values))
}

/// Date column parsed from `source` with `format`.
pub(crate) fn date_column(df: &DataFrame, source: &str, target: &str, format: &str) -> Result<Series> {
    let days: Vec<Option<i32>> = string_values(df, source)?
        .iter()
        .map(|v| {
            v.as_deref()
                .and_then(|s| parse_date(s, format))
                .map(days_since_epoch)
        })
        .collect();
    Ok(Series::new(target.into(), days).cast(&DataType::Date)?)
}
