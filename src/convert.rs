//! Conversion pipeline
//!
//! Wires the pieces together: delimiter detection, header and sample
//! reading, type inference, and SQL generation into a writer.
//!
//! Configuration problems are detected before the first byte is written.
//! After that, an I/O or decoding failure aborts the run and leaves
//! whatever was already written in place.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::ConvertConfig;
use crate::delimiter::{detect_delimiter_in, Delimiter};
use crate::error::{ConvertError, ConvertResult};
use crate::generator::SqlGenerator;
use crate::normalize::normalize_identifier;
use crate::source::CsvSource;
use crate::table::Table;

/// Outcome of one conversion
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    /// Table with its inferred column types
    pub table: Table,
    /// Separator the source was parsed with
    pub delimiter: Delimiter,
    /// Data rows written to INSERT blocks
    pub record_count: usize,
    /// Malformed rows that were skipped
    pub skipped_rows: usize,
    /// INSERT blocks written
    pub batch_count: usize,
}

impl ConversionSummary {
    /// Column name to SQL type name
    pub fn type_map(&self) -> BTreeMap<String, &'static str> {
        self.table.type_map()
    }
}

/// Separator to parse a file with: the configured one, or detected
pub fn resolve_delimiter(config: &ConvertConfig, input: &Path) -> ConvertResult<Delimiter> {
    match config.field_separator() {
        Some(delimiter) => Ok(delimiter),
        None => detect_delimiter_in(input),
    }
}

/// Table name derived from a file name: its normalized stem
pub fn default_table_name(input: &Path) -> ConvertResult<String> {
    let stem = input
        .file_stem()
        .ok_or_else(|| ConvertError::EmptyTableName(input.display().to_string()))?;
    let name = normalize_identifier(&stem.to_string_lossy());
    if name.is_empty() {
        return Err(ConvertError::EmptyTableName(stem.to_string_lossy().to_string()));
    }
    Ok(name)
}

/// File name of a generated script: `<dd.mm.YYYY>_<table>.sql`
pub fn output_file_name(table_name: &str, date: NaiveDate) -> String {
    format!("{}_{}.sql", date.format("%d.%m.%Y"), table_name)
}

/// Full path of today's script for a table inside the configured output directory
pub fn output_path(config: &ConvertConfig, table_name: &str) -> PathBuf {
    config
        .output_dir()
        .join(output_file_name(table_name, Local::now().date_naive()))
}

/// Convert a delimited file into a SQL script
///
/// # Arguments
/// * `config` - Conversion settings
/// * `input` - Source file
/// * `table_name` - Target table name, normalized here
/// * `out` - Destination for the script text
///
/// # Returns
/// * `Ok(ConversionSummary)` - Inferred table and row counts
/// * `Err` - Configuration, header, I/O or decoding failure
pub fn convert_file<W: Write>(
    config: &ConvertConfig,
    input: &Path,
    table_name: &str,
    out: W,
) -> ConvertResult<ConversionSummary> {
    config.validate()?;

    let delimiter = resolve_delimiter(config, input)?;
    let source = CsvSource::open(input, delimiter)?;
    convert_source(config, &source, table_name, out)
}

/// Convert an already opened source
///
/// Runs the bounded sample scan, freezes the column types, then streams
/// the full scan into `out`.
pub fn convert_source<W: Write>(
    config: &ConvertConfig,
    source: &CsvSource,
    table_name: &str,
    out: W,
) -> ConvertResult<ConversionSummary> {
    config.validate()?;

    let sample = source.sample(config.sample_size())?;
    debug!(rows = sample.len(), "sampled rows for type inference");

    let table = Table::from_sample(table_name, source.headers(), &sample, config.dialect())?;
    drop(sample);

    let source_name = source.path().display().to_string();
    write_script(config, table, source.delimiter(), &source_name, source.rows()?, out)
}

/// Convert rows already split into fields
///
/// The first `sample_size` rows are buffered for type inference, then
/// every row (sample included) is streamed into the script. The iterator
/// is consumed exactly once.
pub fn convert_rows<W, I, H>(
    config: &ConvertConfig,
    table_name: &str,
    delimiter: Delimiter,
    headers: &[H],
    rows: I,
    source_name: &str,
    out: W,
) -> ConvertResult<ConversionSummary>
where
    W: Write,
    I: IntoIterator<Item = Vec<String>>,
    H: AsRef<str>,
{
    config.validate()?;

    let mut rows = rows.into_iter();
    let sample: Vec<Vec<String>> = rows.by_ref().take(config.sample_size()).collect();
    let table = Table::from_sample(table_name, headers, &sample, config.dialect())?;

    let stream = sample.into_iter().chain(rows).map(Ok);
    write_script(config, table, delimiter, source_name, stream, out)
}

fn write_script<W, I>(
    config: &ConvertConfig,
    table: Table,
    delimiter: Delimiter,
    source_name: &str,
    rows: I,
    mut out: W,
) -> ConvertResult<ConversionSummary>
where
    W: Write,
    I: Iterator<Item = ConvertResult<Vec<String>>>,
{
    let mut generator = SqlGenerator::new(&table, config.dialect(), config.batch_size())?;

    out.write_all(generator.header_comment(source_name)?.as_bytes())?;
    out.write_all(generator.schema_statement()?.as_bytes())?;

    for row in rows {
        let row = row?;
        if let Some(block) = generator.push_row(row.as_slice())? {
            out.write_all(block.as_bytes())?;
        }
    }
    if let Some(block) = generator.finish()? {
        out.write_all(block.as_bytes())?;
    }
    out.flush()?;

    let record_count = generator.record_count();
    let skipped_rows = generator.skipped_count();
    let batch_count = generator.batch_count();
    drop(generator);

    if skipped_rows > 0 {
        warn!(skipped = skipped_rows, "skipped rows whose field count does not match the header");
    }
    info!(
        table = table.name(),
        dialect = %config.dialect(),
        records = record_count,
        "conversion complete"
    );

    Ok(ConversionSummary {
        table,
        delimiter,
        record_count,
        skipped_rows,
        batch_count,
    })
}
