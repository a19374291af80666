use crate::types::{
    CatalogSummary, CoercionStat, LoadSummary, MergeSummary, MissingDataReport, ReviewSummary,
    RunReport, ValueRange,
};
use crate::utils::format_values;
use std::fmt;

/// `1234567` → `1,234,567`.
pub fn thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

fn range(value: Option<ValueRange>, fmt_one: impl Fn(f64) -> String) -> String {
    match value {
        Some(r) => format!("{} - {}", fmt_one(r.min), fmt_one(r.max)),
        None => "n/a".to_string(),
    }
}

fn write_coercion(
    f: &mut fmt::Formatter<'_>,
    stat: &CoercionStat,
    target_kind: &str,
    fmt_one: impl Fn(f64) -> String,
) -> fmt::Result {
    writeln!(
        f,
        "• {} → {}: {:.1}% values missing",
        stat.source, target_kind, stat.missing_pct
    )?;
    if stat.range.is_some() {
        writeln!(f, "• {} range: {}", stat.target, range(stat.range, fmt_one))?;
    }
    Ok(())
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "✓ Main dataset loaded: {} records ({})",
            thousands(self.catalog_rows as i64),
            self.catalog_file
        )?;
        writeln!(
            f,
            "✓ Reviews dataset loaded: {} records ({})",
            thousands(self.review_rows as i64),
            self.reviews_file
        )
    }
}

impl fmt::Display for CatalogSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Main dataset variable anomalies:")?;
        writeln!(f, "• Categories: {} unique values", self.raw_categories)?;
        for c in &self.corrections {
            writeln!(
                f,
                "• {} row(s) with '{}' in {} realigned one column to the right",
                c.rows_corrected, c.sentinel, c.column
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Main dataset variable processing:")?;
        writeln!(
            f,
            "• App names: {} unique (emoji removed)",
            thousands(self.unique_apps as i64)
        )?;
        writeln!(f, "• Categories: {} unique", self.unique_categories)?;
        writeln!(f, "• App types: {}", format_values(&self.types))?;
        writeln!(f, "• Content Rating: {}", format_values(&self.content_ratings))?;
        writeln!(f, "• Genres: {} unique", self.unique_genres)?;
        writeln!(f, "• Installs: {}", format_values(&self.installs))?;
        write_coercion(f, &self.rating_value, "numeric", |v| format!("{:.1}", v))?;
        write_coercion(f, &self.last_updated, "date", |v| format!("{}", v))?;
        write_coercion(f, &self.ratings_count, "numeric", |v| thousands(v as i64))?;
        writeln!(f)?;

        writeln!(f, "Main dataset structure anomalies:")?;
        if let Some((name, rows)) = &self.duplicates.most_duplicated {
            writeln!(
                f,
                "• Duplicate apps: {} names repeated; '{}' appears {} times in {} distinct combinations",
                self.duplicates.duplicated_names,
                name,
                rows,
                self.duplicates.most_duplicated_variants
            )?;
        }
        if self.incomplete_rows_dropped > 0 {
            writeln!(
                f,
                "• {} rows with incomplete attributes dropped",
                self.incomplete_rows_dropped
            )?;
        }
        writeln!(
            f,
            "✓ Ratings Count aggregated over identical entries: {} → {} rows",
            thousands(self.rows_before_dedup as i64),
            thousands(self.rows_after_dedup as i64)
        )?;
        writeln!(f)?;

        writeln!(f, "Main dataset unit conversion:")?;
        write_coercion(f, &self.size_kb, "Size KB", |v| format!("{:.0} KB", v))?;
        write_coercion(f, &self.price_usd, "Price USD", |v| format!("${:.2}", v))
    }
}

impl fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reviews dataset variables:")?;
        writeln!(f, "• Translated reviews: {} entries", thousands(self.rows as i64))?;
        writeln!(f, "• Sentiment categories: {}", format_values(&self.sentiments))?;
        write_coercion(f, &self.polarity, "numeric", |v| format!("{:.2}", v))?;
        write_coercion(f, &self.subjectivity, "numeric", |v| format!("{:.2}", v))?;
        if self.empty_reviews_dropped > 0 {
            writeln!(
                f,
                "• {} reviews without sentiment dropped",
                thousands(self.empty_reviews_dropped as i64)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "• Apps reviewed but not in the main dataset: {} (excluded)",
            self.unmatched_review_apps
        )?;
        writeln!(f, "✓ Datasets merged")?;
        writeln!(
            f,
            "• Final dataset shape: {} rows × {} columns",
            thousands(self.rows as i64),
            self.columns.len()
        )?;
        writeln!(f, "• Columns: {}", self.columns.join(", "))
    }
}

impl fmt::Display for MissingDataReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            writeln!(f, "• No missing values")?;
        }
        for c in &self.columns {
            writeln!(f, "• {}: {:.0}% missing", c.column, c.missing_pct)?;
        }
        writeln!(f)?;

        let nr = &self.no_review;
        writeln!(
            f,
            "Apps without text reviews ({} apps, {} rows):",
            thousands(nr.apps as i64),
            thousands(nr.rows as i64)
        )?;
        writeln!(f, "• Categories: {} unique", nr.categories)?;
        writeln!(f, "• Types: {}", format_values(&nr.types))?;
        writeln!(f, "• Content Ratings: {}", format_values(&nr.content_ratings))?;
        writeln!(f, "• Install ranges: {}", format_values(&nr.installs))?;
        writeln!(
            f,
            "• Rating Value range: {}",
            range(nr.rating_value, |v| format!("{:.1}", v))
        )?;
        writeln!(
            f,
            "• Ratings Count range: {}",
            range(nr.ratings_count, |v| thousands(v as i64))
        )?;
        writeln!(
            f,
            "• Size KB range: {}",
            range(nr.size_kb, |v| format!("{:.0} KB", v))
        )?;
        writeln!(
            f,
            "• Price USD range: {}",
            range(nr.price_usd, |v| format!("${:.2}", v))
        )
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Loading datasets")?;
        writeln!(f, "{}", self.load)?;
        writeln!(f, "---- Quality checks and transformations")?;
        writeln!(f, "{}", self.catalog)?;
        writeln!(f, "{}", self.reviews)?;
        writeln!(f, "---- Merging datasets")?;
        writeln!(f, "{}", self.merge)?;
        writeln!(f, "---- Missing data analysis")?;
        write!(f, "{}", self.missing)?;
        if let Some(path) = &self.output_file {
            writeln!(f)?;
            writeln!(f, "---- Saving preprocessed dataset")?;
            writeln!(f, "✓ Saved to {}", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnMissing, NoReviewSummary};

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(8_894_734), "8,894,734");
        assert_eq!(thousands(-12_345), "-12,345");
    }

    #[test]
    fn test_merge_summary_display() {
        let summary = MergeSummary {
            unmatched_review_apps: 54,
            rows: 12_345,
            apps: 100,
            columns: vec!["App_id".to_string(), "App".to_string()],
        };
        let text = summary.to_string();
        assert!(text.contains("not in the main dataset: 54"));
        assert!(text.contains("12,345 rows × 2 columns"));
        assert!(text.contains("Columns: App_id, App"));
    }

    #[test]
    fn test_missing_report_display() {
        let report = MissingDataReport {
            rows: 10,
            columns: vec![ColumnMissing {
                column: "Sentiment".to_string(),
                missing_pct: 40.0,
            }],
            no_review: NoReviewSummary {
                rows: 4,
                apps: 4,
                categories: 3,
                types: vec![Some("Free".to_string()), Some("Paid".to_string())],
                content_ratings: vec![Some("Everyone".to_string())],
                installs: vec![Some("10,000+".to_string())],
                rating_value: Some(ValueRange { min: 4.1, max: 4.4 }),
                ratings_count: None,
                size_kb: Some(ValueRange { min: 512.0, max: 19456.0 }),
                price_usd: Some(ValueRange { min: 0.0, max: 4.99 }),
            },
        };
        let text = report.to_string();
        assert!(text.contains("• Sentiment: 40% missing"));
        assert!(text.contains("• Types: ['Free', 'Paid']"));
        assert!(text.contains("• Ratings Count range: n/a"));
        assert!(text.contains("• Size KB range: 512 KB - 19456 KB"));
        assert!(text.contains("• Price USD range: $0.00 - $4.99"));
    }
}
