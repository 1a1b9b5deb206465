//! CLI argument parsing module for csv2sql
//!
//! This module handles parsing command-line arguments using the clap crate.
//! Every flag is optional and overrides the matching key of the settings
//! file, which in turn overrides the built-in defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{ConfigFile, ConvertConfig};
use crate::delimiter::Delimiter;
use crate::dialect::Dialect;

/// Command-line arguments for csv2sql
#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Convert CSV and delimiter-separated files into SQL scripts"
)]
pub struct Csv2SqlArgs {
    /// Delimited file to convert
    #[clap(help = "CSV or delimiter-separated file to convert")]
    pub file: PathBuf,

    /// Target table name
    ///
    /// Normalized the same way as column names. Defaults to the file name
    /// without its extension.
    #[clap(help = "Table name (defaults to the file name)")]
    pub table: Option<String>,

    /// Target SQL dialect: mysql or postgres
    #[clap(short, long, help = "Target SQL dialect (mysql or postgres)")]
    pub dialect: Option<String>,

    /// Maximum rows per INSERT block
    #[clap(short, long, help = "Rows per INSERT transaction block")]
    pub batch_size: Option<usize>,

    /// Number of leading rows used for type inference
    #[clap(long, help = "Rows sampled for column type inference")]
    pub sample_size: Option<usize>,

    /// Directory for the generated script
    ///
    /// The script is named `<dd.mm.YYYY>_<table>.sql`.
    #[clap(short, long, help = "Directory for the generated script")]
    pub output_dir: Option<PathBuf>,

    /// Write the script to this exact path instead of the output directory
    #[clap(long, conflicts_with = "output_dir", help = "Explicit output file path")]
    pub output: Option<PathBuf>,

    /// Specify field separator character
    ///
    /// Disables delimiter detection. Examples: -F';' or -F'\t'.
    #[clap(short = 'F', long, help = "Field separator character (skips detection)")]
    pub field_separator: Option<String>,

    /// Show the first rows of the file before converting
    #[clap(short, long, value_name = "ROWS", num_args = 0..=1, default_missing_value = "0", help = "Preview the first rows before converting")]
    pub preview: Option<usize>,

    /// TOML settings file
    #[clap(short, long, help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,

    /// Enable verbose diagnostic output
    #[clap(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Csv2SqlArgs {
    /// Build the conversion configuration from the settings file and flags
    ///
    /// Unsupported dialects and invalid separators are rejected here,
    /// before any file is opened for writing.
    pub fn to_config(&self) -> Result<ConvertConfig> {
        let mut config = ConvertConfig::default();

        if let Some(path) = &self.config {
            ConfigFile::from_file(path)
                .and_then(|file| file.apply_to(&mut config))
                .with_context(|| format!("Failed to load settings from {}", path.display()))?;
        }

        if let Some(dialect) = &self.dialect {
            config.set_dialect(dialect.parse::<Dialect>()?);
        }
        if let Some(batch_size) = self.batch_size {
            config.set_batch_size(batch_size);
        }
        if let Some(sample_size) = self.sample_size {
            config.set_sample_size(sample_size);
        }
        if let Some(output_dir) = &self.output_dir {
            config.set_output_dir(output_dir.clone());
        }
        if let Some(separator) = &self.field_separator {
            config.set_field_separator(Some(Delimiter::from_user(separator)?));
        }
        // A bare --preview keeps the configured row count
        if let Some(rows) = self.preview.filter(|rows| *rows > 0) {
            config.set_preview_rows(rows);
        }

        config.validate()?;
        Ok(config)
    }
}

/// Parse command-line arguments into the Csv2SqlArgs structure
pub fn parse_args() -> Result<Csv2SqlArgs> {
    Ok(Csv2SqlArgs::parse())
}
