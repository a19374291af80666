//! Reading the two input files.
//!
//! Every column is read as a string; typing happens in the cleaner where
//! unparseable cells can turn into nulls instead of failing the read.

use crate::cleaner::nullify_tokens;
use crate::config::PipelineConfig;
use crate::error::{PrepError, Result, ResultExt};
use crate::schema::{CATALOG_COLUMNS, REVIEW_COLUMNS};
use crate::utils::require_columns;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Read a comma-separated file with a header row, all columns as strings.
///
/// A missing file is reported as [`PrepError::InputNotFound`]; structural
/// problems surface as polars errors with the path attached. A row with more
/// fields than the header is an error, a row with fewer is padded with nulls.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PrepError::InputNotFound(path.to_path_buf()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to read {}", path.display()))?;

    debug!("Read {} with shape {:?}", path.display(), df.shape());
    Ok(df)
}

/// Read a file, check its columns and null out the configured NA tokens.
fn load_table(path: &Path, required: &[&str], null_tokens: &[String]) -> Result<DataFrame> {
    let df = read_csv(path)?;
    require_columns(&df, &path.display().to_string(), required)?;

    let (df, replaced) = nullify_tokens(df, null_tokens)?;
    if replaced > 0 {
        debug!("{}: {} cells read as missing", path.display(), replaced);
    }
    Ok(df)
}

/// Load the app catalog.
pub fn load_catalog(config: &PipelineConfig) -> Result<DataFrame> {
    let df = load_table(&config.catalog_path, &CATALOG_COLUMNS, &config.null_tokens)?;
    info!("Main dataset loaded: {} records", df.height());
    Ok(df)
}

/// Load the user reviews.
pub fn load_reviews(config: &PipelineConfig) -> Result<DataFrame> {
    let df = load_table(&config.reviews_path, &REVIEW_COLUMNS, &config.null_tokens)?;
    info!("Reviews dataset loaded: {} records", df.height());
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_csv_keeps_strings() {
        let file = write_temp("App,Rating,Installs\nFoo,4.1,\"10,000+\"\nBar,NaN,100+\n");
        let df = read_csv(file.path()).unwrap();

        assert_eq!(df.shape(), (2, 3));
        for col in df.get_columns() {
            assert_eq!(col.dtype(), &DataType::String);
        }
        let installs = crate::utils::string_values(&df, "Installs").unwrap();
        assert_eq!(installs[0].as_deref(), Some("10,000+"));
    }

    #[test]
    fn test_read_csv_rejects_extra_fields() {
        let file = write_temp("App,Rating,Installs\nFoo,4.1,100+\nBar,NaN,100+,Free,0\n");
        let err = read_csv(file.path()).unwrap_err();

        assert_eq!(err.error_code(), "POLARS_ERROR");
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_read_csv_pads_short_rows() {
        let file = write_temp("App,Rating,Installs\nFoo,4.1,100+\nBar,3.9\n");
        let df = read_csv(file.path()).unwrap();

        assert_eq!(df.shape(), (2, 3));
        let installs = crate::utils::string_values(&df, "Installs").unwrap();
        assert_eq!(installs, vec![Some("100+".to_string()), None]);
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PrepError::InputNotFound(_)));
    }

    #[test]
    fn test_load_reviews_nullifies_nan_text() {
        let file = write_temp(
            "App,Translated_Review,Sentiment,Sentiment_Polarity,Sentiment_Subjectivity\n\
             Foo,nan,nan,nan,nan\n\
             Foo,Good,Positive,0.5,0.6\n",
        );
        let config = PipelineConfig::builder()
            .reviews_path(file.path())
            .build()
            .unwrap();

        let df = load_reviews(&config).unwrap();
        let sentiment = crate::utils::string_values(&df, "Sentiment").unwrap();
        assert_eq!(sentiment, vec![None, Some("Positive".to_string())]);
    }

    #[test]
    fn test_load_catalog_requires_columns() {
        let file = write_temp("App,Category\nFoo,TOOLS\n");
        let config = PipelineConfig::builder()
            .catalog_path(file.path())
            .build()
            .unwrap();

        let err = load_catalog(&config).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_COLUMNS");
        assert!(err.is_input_error());
    }
}
