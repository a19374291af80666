//! Cell-level sanitization: NA tokens and emoji.

use crate::error::Result;
use crate::utils::column;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// Emoji sequences: a pictograph forced into emoji presentation, any
/// pictograph outside Latin-1 and the letterlike block (so `©` and `™` stay),
/// emoji-presentation characters, skin tones, joiners, variation selector 16,
/// the keycap mark and tag characters.
static EMOJI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\p{Extended_Pictographic}\x{FE0F}",
        r"|[\p{Extended_Pictographic}--[\x{0000}-\x{214F}]]",
        r"|[\p{Emoji_Presentation}\p{Emoji_Modifier}\x{200D}\x{FE0F}\x{20E3}\x{E0020}-\x{E007F}]",
    ))
    .expect("Invalid regex: emoji")
});

/// Remove emoji from `text` and trim the surrounding whitespace.
///
/// ```rust,ignore
/// assert_eq!(strip_emoji("App™ 😀"), "App™");
/// ```
pub fn strip_emoji(text: &str) -> String {
    EMOJI_PATTERN.replace_all(text, "").trim().to_string()
}

/// Apply [`strip_emoji`] to every cell of a string column.
///
/// Returns the number of cells that changed.
pub(crate) fn strip_emoji_column(df: &mut DataFrame, name: &str) -> Result<usize> {
    let series = column(df, name)?.as_materialized_series().clone();
    let str_series = series.str()?;
    let mut changed = 0;

    let cleaned: Vec<Option<String>> = str_series
        .into_iter()
        .map(|opt_val| {
            opt_val.map(|val| {
                let stripped = strip_emoji(val);
                if stripped != val {
                    changed += 1;
                }
                stripped
            })
        })
        .collect();

    df.replace(name, Series::new(name.into(), cleaned))?;
    Ok(changed)
}

/// Turn every string cell exactly equal to one of `tokens` into null.
///
/// Returns the frame and the number of cells replaced.
pub fn nullify_tokens(df: DataFrame, tokens: &[String]) -> Result<(DataFrame, usize)> {
    let mut df = df;
    if tokens.is_empty() {
        return Ok((df, 0));
    }

    let token_set: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    let column_names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect();

    let mut total_replacements = 0;

    for col_name in &column_names {
        let series = column(&df, col_name)?.as_materialized_series();
        if series.dtype() != &DataType::String {
            continue;
        }

        let (cleaned_series, count) = replace_tokens_with_null(series, &token_set)?;
        if count > 0 {
            total_replacements += count;
            df.replace(col_name, cleaned_series)?;
        }
    }

    if total_replacements > 0 {
        debug!("Replaced {} NA tokens with null", total_replacements);
    }

    Ok((df, total_replacements))
}

fn replace_tokens_with_null(series: &Series, tokens: &HashSet<&str>) -> Result<(Series, usize)> {
    let str_series = series.str()?;
    let mut cleaned_values = Vec::with_capacity(str_series.len());
    let mut replacement_count = 0;

    for opt_val in str_series.into_iter() {
        match opt_val {
            Some(val) if tokens.contains(val) => {
                cleaned_values.push(None);
                replacement_count += 1;
            }
            Some(val) => cleaned_values.push(Some(val.to_string())),
            None => cleaned_values.push(None),
        }
    }

    Ok((
        Series::new(series.name().clone(), cleaned_values),
        replacement_count,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::string_values;

    #[test]
    fn test_strip_emoji_keeps_trademark() {
        assert_eq!(strip_emoji("App™ 😀"), "App™");
    }

    #[test]
    fn test_strip_emoji_sequences() {
        assert_eq!(strip_emoji("👍🏽 Thumbs"), "Thumbs");
        assert_eq!(strip_emoji("Family 👨‍👩‍👧"), "Family");
        assert_eq!(strip_emoji("Flags 🇺🇸"), "Flags");
        assert_eq!(strip_emoji("❤️ Love"), "Love");
        assert_eq!(strip_emoji("❤ Love"), "Love");
    }

    #[test]
    fn test_strip_emoji_preserves_text() {
        assert_eq!(strip_emoji("Café © 2018"), "Café © 2018");
        assert_eq!(strip_emoji("日本語アプリ"), "日本語アプリ");
        assert_eq!(
            strip_emoji("Photo Editor & Candy Camera"),
            "Photo Editor & Candy Camera"
        );
        assert_eq!(strip_emoji("Number 1"), "Number 1");
    }

    #[test]
    fn test_strip_emoji_column_counts_changes() {
        let mut df = df!("App" => [Some("Moana 🎨"), Some("Plain"), None]).unwrap();
        let changed = strip_emoji_column(&mut df, "App").unwrap();

        assert_eq!(changed, 1);
        assert_eq!(
            string_values(&df, "App").unwrap(),
            vec![Some("Moana".to_string()), Some("Plain".to_string()), None]
        );
    }

    #[test]
    fn test_nullify_tokens_exact_match_only() {
        let df = df!(
            "Sentiment" => [Some("nan"), Some("Positive"), Some("NaN"), Some("nano")],
            "Score" => [1.0, 2.0, 3.0, 4.0]
        )
        .unwrap();
        let tokens = vec!["nan".to_string(), "NaN".to_string()];

        let (df, replaced) = nullify_tokens(df, &tokens).unwrap();

        assert_eq!(replaced, 2);
        assert_eq!(
            string_values(&df, "Sentiment").unwrap(),
            vec![None, Some("Positive".to_string()), None, Some("nano".to_string())]
        );
        assert_eq!(df.column("Score").unwrap().dtype(), &DataType::Float64);
    }
}
