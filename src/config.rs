//! Configuration module for csv2sql
//!
//! This module provides the configuration object passed explicitly into
//! the conversion pipeline. Nothing reads module-level state, so several
//! conversions with different settings can run side by side (the tests do).
//!
//! Settings come from three layers, later ones winning: built-in defaults,
//! an optional TOML file, and command-line flags.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::delimiter::Delimiter;
use crate::dialect::Dialect;
use crate::error::{ConvertError, ConvertResult};

/// Rows per INSERT block unless configured otherwise
pub const DEFAULT_BATCH_SIZE: usize = 500;
/// Rows sampled for type inference unless configured otherwise
pub const DEFAULT_SAMPLE_SIZE: usize = 10;
/// Rows shown by the preview unless configured otherwise
pub const DEFAULT_PREVIEW_ROWS: usize = 5;
/// Directory generated scripts are written to unless configured otherwise
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Conversion configuration
///
/// Created once at startup and handed to every component that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Target SQL dialect
    dialect: Dialect,

    /// Maximum rows per INSERT block
    batch_size: usize,

    /// Number of leading data rows used for type inference
    sample_size: usize,

    /// Number of rows shown by the preview
    preview_rows: usize,

    /// Directory for generated scripts
    output_dir: PathBuf,

    /// Explicit field separator; `None` means detect from the first line
    field_separator: Option<Delimiter>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

impl ConvertConfig {
    /// Create a configuration with default settings for a dialect
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            batch_size: DEFAULT_BATCH_SIZE,
            sample_size: DEFAULT_SAMPLE_SIZE,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            field_separator: None,
        }
    }

    /// Get the target dialect
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Set the target dialect
    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    /// Get the batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Set the batch size
    pub fn set_batch_size(&mut self, batch_size: usize) {
        self.batch_size = batch_size;
    }

    /// Get the sample size
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Set the sample size
    pub fn set_sample_size(&mut self, sample_size: usize) {
        self.sample_size = sample_size;
    }

    /// Get the number of preview rows
    pub fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    /// Set the number of preview rows
    pub fn set_preview_rows(&mut self, preview_rows: usize) {
        self.preview_rows = preview_rows;
    }

    /// Get the output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Set the output directory
    pub fn set_output_dir(&mut self, output_dir: impl Into<PathBuf>) {
        self.output_dir = output_dir.into();
    }

    /// Get the explicit field separator, if any
    pub fn field_separator(&self) -> Option<Delimiter> {
        self.field_separator
    }

    /// Set an explicit field separator
    pub fn set_field_separator(&mut self, separator: Option<Delimiter>) {
        self.field_separator = separator;
    }

    /// Check the settings before any output is produced
    pub fn validate(&self) -> ConvertResult<()> {
        if self.batch_size == 0 {
            return Err(ConvertError::InvalidBatchSize(self.batch_size));
        }
        if self.sample_size == 0 {
            return Err(ConvertError::InvalidSampleSize(self.sample_size));
        }
        Ok(())
    }
}

/// Settings file (`csv2sql.toml`)
///
/// Every key is optional; missing keys leave the current value untouched.
///
/// ```toml
/// dialect = "mysql"
/// batch_size = 1000
/// sample_size = 25
/// preview_rows = 5
/// output_dir = "/app/backups"
/// field_separator = ";"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub dialect: Option<String>,
    pub batch_size: Option<usize>,
    pub sample_size: Option<usize>,
    pub preview_rows: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub field_separator: Option<String>,
}

impl ConfigFile {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> ConvertResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse settings from TOML text
    pub fn from_toml(toml: &str) -> ConvertResult<Self> {
        toml::from_str(toml).map_err(|e| ConvertError::ConfigError(e.to_string()))
    }

    /// Overlay these settings onto a configuration
    ///
    /// Dialect and separator strings are validated here, so a typo in the
    /// file is reported as a configuration error rather than ignored.
    pub fn apply_to(&self, config: &mut ConvertConfig) -> ConvertResult<()> {
        if let Some(dialect) = &self.dialect {
            config.set_dialect(dialect.parse()?);
        }
        if let Some(batch_size) = self.batch_size {
            config.set_batch_size(batch_size);
        }
        if let Some(sample_size) = self.sample_size {
            config.set_sample_size(sample_size);
        }
        if let Some(preview_rows) = self.preview_rows {
            config.set_preview_rows(preview_rows);
        }
        if let Some(output_dir) = &self.output_dir {
            config.set_output_dir(output_dir.clone());
        }
        if let Some(separator) = &self.field_separator {
            config.set_field_separator(Some(Delimiter::from_user(separator)?));
        }
        Ok(())
    }
}
