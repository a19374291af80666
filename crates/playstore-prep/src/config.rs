//! Configuration types for the preparation pipeline.
//!
//! Defaults reproduce the fixed behavior of the pipeline: the two input files
//! under `data/`, the output at `data/prep_fact_data.csv`, one shift rule for
//! the known misaligned catalog row and `Varies with device` as the size
//! sentinel. Everything can be overridden through the builder or a JSON file.

use crate::error::PrepError;
use crate::schema::{APP, CATALOG_COLUMNS, CATEGORY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default catalog input path.
pub const DEFAULT_CATALOG_PATH: &str = "data/googleplaystore.csv";
/// Default review input path.
pub const DEFAULT_REVIEWS_PATH: &str = "data/googleplaystore_user_reviews.csv";
/// Default output path.
pub const DEFAULT_OUTPUT_PATH: &str = "data/prep_fact_data.csv";
/// Size value meaning "no single size".
pub const DEFAULT_SIZE_SENTINEL: &str = "Varies with device";
/// Textual month-day-year format of `Last Updated` (`January 7, 2018`).
pub const DEFAULT_DATE_FORMAT: &str = "%B %d, %Y";

/// Cell texts read as missing, matching the NA tokens pandas recognizes by default.
pub const DEFAULT_NULL_TOKENS: [&str; 17] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "n/a", "nan",
];

/// A row-realignment rule for a known source misalignment.
///
/// Rows where `column` holds `sentinel` lost one value upstream of `column`,
/// so every value from `column` onward sits one position too far left. The
/// correction moves them back one position to the right; the vacated cell in
/// `column` receives `fill` (null when `None`) and the value that was in the
/// last column is discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRule {
    /// Column holding the out-of-domain sentinel.
    pub column: String,
    /// The sentinel value marking misaligned rows.
    pub sentinel: String,
    /// Value written into `column` after the shift.
    #[serde(default)]
    pub fill: Option<String>,
}

impl ShiftRule {
    pub fn new(column: impl Into<String>, sentinel: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            sentinel: sentinel.into(),
            fill: None,
        }
    }

    /// Set the value written into the vacated cell.
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }
}

impl Default for ShiftRule {
    /// The catalog row whose `Category` reads `1.9`.
    fn default() -> Self {
        Self::new(CATEGORY, "1.9")
    }
}

/// Configuration for the preparation pipeline.
///
/// Use [`PipelineConfig::builder()`] for a fluent setup or
/// [`PipelineConfig::from_json_file`] to read overrides from disk. Missing
/// JSON fields fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// App catalog CSV.
    pub catalog_path: PathBuf,

    /// User review CSV.
    pub reviews_path: PathBuf,

    /// Destination of the merged fact table.
    pub output_path: PathBuf,

    /// Realignment rules applied to the raw catalog, in order.
    pub shift_rules: Vec<ShiftRule>,

    /// Size value treated as missing.
    pub size_sentinel: String,

    /// chrono format of `Last Updated`.
    pub date_format: String,

    /// Cell texts read as null on load.
    pub null_tokens: Vec<String>,

    /// Drop review rows without any sentiment data.
    /// Default: true
    pub drop_empty_reviews: bool,

    /// Drop catalog rows with a null grouping key before aggregation.
    /// When false, null is kept as its own group value.
    /// Default: true
    pub drop_incomplete_groups: bool,

    /// Write the fact table to `output_path`. When false the table is only
    /// returned in memory.
    /// Default: true
    pub write_output: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            reviews_path: PathBuf::from(DEFAULT_REVIEWS_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            shift_rules: vec![ShiftRule::default()],
            size_sentinel: DEFAULT_SIZE_SENTINEL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            null_tokens: DEFAULT_NULL_TOKENS.iter().map(|s| s.to_string()).collect(),
            drop_empty_reviews: true,
            drop_incomplete_groups: true,
            write_output: true,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Read a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PrepError::InputNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        for (field, path) in [
            ("catalog_path", &self.catalog_path),
            ("reviews_path", &self.reviews_path),
            ("output_path", &self.output_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigValidationError::EmptyPath(field.to_string()));
            }
        }

        for rule in &self.shift_rules {
            if rule.sentinel.is_empty() {
                return Err(ConfigValidationError::EmptySentinel(rule.column.clone()));
            }
            // The name column anchors the row and is never shifted.
            if rule.column == APP || !CATALOG_COLUMNS.contains(&rule.column.as_str()) {
                return Err(ConfigValidationError::InvalidShiftColumn(rule.column.clone()));
            }
        }

        if self.date_format.trim().is_empty() {
            return Err(ConfigValidationError::EmptyDateFormat);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Path for '{0}' must not be empty")]
    EmptyPath(String),

    #[error("Shift rule on '{0}' has an empty sentinel")]
    EmptySentinel(String),

    #[error("Shift rule column '{0}' is not a shiftable catalog column")]
    InvalidShiftColumn(String),

    #[error("Date format must not be empty")]
    EmptyDateFormat,
}

impl From<ConfigValidationError> for PrepError {
    fn from(err: ConfigValidationError) -> Self {
        PrepError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    catalog_path: Option<PathBuf>,
    reviews_path: Option<PathBuf>,
    output_path: Option<PathBuf>,
    shift_rules: Option<Vec<ShiftRule>>,
    size_sentinel: Option<String>,
    date_format: Option<String>,
    null_tokens: Option<Vec<String>>,
    drop_empty_reviews: Option<bool>,
    drop_incomplete_groups: Option<bool>,
    write_output: Option<bool>,
}

impl PipelineConfigBuilder {
    /// Set the app catalog input path.
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Set the review input path.
    pub fn reviews_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.reviews_path = Some(path.into());
        self
    }

    /// Set the output path of the fact table.
    pub fn output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Replace the realignment rules. An empty list disables correction.
    pub fn shift_rules(mut self, rules: Vec<ShiftRule>) -> Self {
        self.shift_rules = Some(rules);
        self
    }

    /// Set the size value treated as missing.
    pub fn size_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.size_sentinel = Some(sentinel.into());
        self
    }

    /// Set the chrono format used to parse `Last Updated`.
    pub fn date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Replace the tokens read as null.
    pub fn null_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Keep or drop review rows without any sentiment data.
    pub fn drop_empty_reviews(mut self, drop: bool) -> Self {
        self.drop_empty_reviews = Some(drop);
        self
    }

    /// Drop catalog rows with null grouping keys before aggregation.
    pub fn drop_incomplete_groups(mut self, drop: bool) -> Self {
        self.drop_incomplete_groups = Some(drop);
        self
    }

    /// Enable or disable writing the fact table to disk.
    pub fn write_output(mut self, write: bool) -> Self {
        self.write_output = Some(write);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            catalog_path: self.catalog_path.unwrap_or(defaults.catalog_path),
            reviews_path: self.reviews_path.unwrap_or(defaults.reviews_path),
            output_path: self.output_path.unwrap_or(defaults.output_path),
            shift_rules: self.shift_rules.unwrap_or(defaults.shift_rules),
            size_sentinel: self.size_sentinel.unwrap_or(defaults.size_sentinel),
            date_format: self.date_format.unwrap_or(defaults.date_format),
            null_tokens: self.null_tokens.unwrap_or(defaults.null_tokens),
            drop_empty_reviews: self.drop_empty_reviews.unwrap_or(defaults.drop_empty_reviews),
            drop_incomplete_groups: self
                .drop_incomplete_groups
                .unwrap_or(defaults.drop_incomplete_groups),
            write_output: self.write_output.unwrap_or(defaults.write_output),
        };

        config.validate()?;
        Ok(config)
    }
}
