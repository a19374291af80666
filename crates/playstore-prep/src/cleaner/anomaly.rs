//! Realignment of rows whose values slipped one column to the left.

use crate::config::ShiftRule;
use crate::error::{PrepError, Result};
use crate::types::AnomalyCorrection;
use crate::utils::string_values;
use polars::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Apply `rule` to `df` in place.
///
/// Rows whose `rule.column` equals the sentinel get every value from that
/// column onward moved one column to the right. The vacated cell receives
/// `rule.fill`; the value that sat in the last column is dropped. All
/// shifted columns become string columns.
pub fn apply_shift_rule(df: &mut DataFrame, rule: &ShiftRule) -> Result<AnomalyCorrection> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let start = names
        .iter()
        .position(|n| n == &rule.column)
        .ok_or_else(|| PrepError::ColumnNotFound(rule.column.clone()))?;

    let mask: Vec<bool> = string_values(df, &rule.column)?
        .iter()
        .map(|v| v.as_deref() == Some(rule.sentinel.as_str()))
        .collect();
    let rows_corrected = mask.iter().filter(|hit| **hit).count();

    let correction = AnomalyCorrection {
        column: rule.column.clone(),
        sentinel: rule.sentinel.clone(),
        rows_corrected,
    };

    if rows_corrected == 0 {
        debug!("No '{}' rows with value '{}'", rule.column, rule.sentinel);
        return Ok(correction);
    }

    let originals: Vec<Vec<Option<String>>> = names[start..]
        .iter()
        .map(|name| string_values(df, name))
        .collect::<Result<_>>()?;

    for (offset, name) in names[start..].iter().enumerate() {
        let shifted: Vec<Option<String>> = originals[offset]
            .iter()
            .enumerate()
            .map(|(row, value)| {
                if !mask[row] {
                    value.clone()
                } else if offset == 0 {
                    rule.fill.clone()
                } else {
                    originals[offset - 1][row].clone()
                }
            })
            .collect();
        df.replace(name, Series::new(name.as_str().into(), shifted))?;
    }

    info!(
        "Realigned {} row(s) where '{}' was '{}'",
        rows_corrected, rule.column, rule.sentinel
    );
    Ok(correction)
}

/// Values of `column` outside the rows flagged by `rule`; the set of
/// legitimate values a corrected cell may hold.
pub fn column_domain(df: &DataFrame, rule: &ShiftRule) -> Result<BTreeSet<String>> {
    Ok(string_values(df, &rule.column)?
        .into_iter()
        .flatten()
        .filter(|v| v != &rule.sentinel)
        .collect())
}
