//! Error handling for csv2sql
//!
//! This module defines the error type shared by every stage of the
//! conversion pipeline. Configuration problems (unknown dialect, zero
//! batch size, bad separator) are reported before any output is written;
//! I/O and CSV decoding failures are fatal and surfaced unchanged.
//!
//! Malformed rows and values that fit no type rule are not errors: the
//! former are skipped, the latter land in the TEXT bucket.

use thiserror::Error;

/// ConvertError represents all possible errors that can occur while converting a file
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Error during file system operations (reading the source, writing the script)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error while decoding delimited file data
    #[error("File parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// The configured dialect is not one of the supported targets
    #[error("Unsupported SQL dialect '{0}' (expected 'mysql' or 'postgres')")]
    UnsupportedDialect(String),

    /// Batch size must be at least one row
    #[error("Invalid batch size {0}: must be greater than zero")]
    InvalidBatchSize(usize),

    /// Sample size must be at least one row
    #[error("Invalid sample size {0}: must be greater than zero")]
    InvalidSampleSize(usize),

    /// Field separator given by the user is not a single character
    #[error("Invalid delimiter: {0}. Must be a single character.")]
    InvalidDelimiter(String),

    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The source file has no header row
    #[error("Header row is empty or missing in '{0}'")]
    EmptyHeader(String),

    /// The table name normalizes to an empty identifier
    #[error("Table name '{0}' does not contain any usable identifier characters")]
    EmptyTableName(String),

    /// A generator step was called out of order
    #[error("Generator used out of order: {0}")]
    GeneratorState(String),
}

impl ConvertError {
    /// Whether the error is a configuration mistake rather than a data or I/O failure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ConvertError::UnsupportedDialect(_)
                | ConvertError::InvalidBatchSize(_)
                | ConvertError::InvalidSampleSize(_)
                | ConvertError::InvalidDelimiter(_)
                | ConvertError::ConfigError(_)
        )
    }
}

/// Result type alias for operations that can produce a ConvertError
pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
