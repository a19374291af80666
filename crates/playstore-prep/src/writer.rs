//! Persisting the fact table and the run report.

use crate::error::{Result, ResultExt};
use crate::types::RunReport;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write `df` as a comma-separated file with a header row.
///
/// The parent directory is created if needed; dates are written as
/// `YYYY-MM-DD`.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<PathBuf> {
    ensure_parent(path)?;
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(df)
        .context(format!("writing {}", path.display()))?;

    info!("Dataset saved: {}", path.display());
    Ok(path.to_path_buf())
}

/// Location of the JSON report belonging to `output`: `<stem>_report.json`
/// in the same directory.
pub fn report_path_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "prep".to_string());
    output.with_file_name(format!("{}_report.json", stem))
}

/// Write `report` as pretty-printed JSON to `path`.
pub fn write_report(report: &RunReport, path: &Path) -> Result<PathBuf> {
    ensure_parent(path)?;
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

    info!("Report saved: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::read_csv;
    use tempfile::TempDir;

    #[test]
    fn test_report_path_for() {
        assert_eq!(
            report_path_for(Path::new("data/prep_fact_data.csv")),
            PathBuf::from("data/prep_fact_data_report.json")
        );
    }

    #[test]
    fn test_write_csv_creates_parent_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.csv");

        let days = Series::new("Last Updated".into(), [Some(17_538i32), None])
            .cast(&DataType::Date)
            .unwrap();
        let mut df = df!(
            "App" => ["Photo Editor, Pro", "ROBLOX"],
            "Size KB" => [Some(19456.0), None]
        )
        .unwrap();
        df.with_column(days).unwrap();

        write_csv(&mut df, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("App,Size KB,Last Updated"));
        assert!(lines.next().unwrap().ends_with(",2018-01-07"));

        let back = read_csv(&path).unwrap();
        assert_eq!(back.shape(), (2, 3));
        let apps = crate::utils::string_values(&back, "App").unwrap();
        assert_eq!(apps[0].as_deref(), Some("Photo Editor, Pro"));
    }
}
