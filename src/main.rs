//! csv2sql - convert delimiter-separated files into SQL scripts
//!
//! # Program Flow
//!
//! 1. Parse command-line arguments and the optional settings file
//! 2. Resolve the table name and the field separator
//! 3. Optionally preview the first rows
//! 4. Infer column types from a sample and write the script
//! 5. Report the output path, processed row count and elapsed time

use std::fs::{self, File};
use std::io::BufWriter;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use csv2sql::cli;
use csv2sql::convert::{convert_source, default_table_name, output_path, resolve_delimiter};
use csv2sql::error::ConvertError;
use csv2sql::logging::init_logging;
use csv2sql::normalize::normalize_identifier;
use csv2sql::preview::render_preview;
use csv2sql::source::CsvSource;

fn format_elapsed(seconds: f64) -> String {
    let whole = seconds as u64;
    format!(
        "{:02}:{:02}:{:02} ({:.2} seconds)",
        whole / 3600,
        (whole % 3600) / 60,
        whole % 60,
        seconds
    )
}

fn main() -> Result<()> {
    // Step 1: arguments and configuration; nothing is written before this succeeds
    let args = cli::parse_args()?;
    init_logging(args.verbose);
    let config = args.to_config()?;

    if !args.file.is_file() {
        bail!("File not found or not readable: {}", args.file.display());
    }

    // Step 2: table name and separator
    let table_name = match &args.table {
        Some(name) => {
            let normalized = normalize_identifier(name);
            if normalized.is_empty() {
                return Err(ConvertError::EmptyTableName(name.clone()).into());
            }
            normalized
        }
        None => default_table_name(&args.file)?,
    };

    let started = Instant::now();
    let delimiter = resolve_delimiter(&config, &args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let source = CsvSource::open(&args.file, delimiter)
        .with_context(|| format!("Failed to load file: {}", args.file.display()))?;

    // Step 3: preview
    if args.preview.is_some() {
        println!("Data preview (up to {} lines, header included):", config.preview_rows());
        println!("{}", render_preview(&source, config.preview_rows())?);
        println!();
    }

    // Step 4: convert
    let output = match &args.output {
        Some(path) => path.clone(),
        None => output_path(&config, &table_name),
    };
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let summary = convert_source(&config, &source, &table_name, BufWriter::new(file))
        .with_context(|| format!("Failed to convert {}", args.file.display()))?;

    // Step 5: report
    println!("Conversion complete");
    println!("{} script written to: {}", config.dialect(), output.display());
    println!("Rows processed (data): {}", summary.record_count);
    if args.verbose {
        println!("Delimiter: {}", summary.delimiter);
        for column in summary.table.columns() {
            println!("  {} -> {}", column.name, column.sql_type);
        }
        if summary.skipped_rows > 0 {
            println!("Skipped malformed rows: {}", summary.skipped_rows);
        }
    }
    println!("Elapsed: {}", format_elapsed(started.elapsed().as_secs_f64()));

    Ok(())
}
