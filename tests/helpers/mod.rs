//! Test helpers for csv2sql integration tests
//!
//! Temporary directories and small CSV fixtures shared by the test modules.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use csv2sql::config::ConvertConfig;
use csv2sql::convert::{convert_file, ConversionSummary};
use tempfile::TempDir;

/// Helper function to create a temp directory for tests, respecting CARGO_TARGET_TMPDIR if set
pub fn create_temp_dir() -> Result<TempDir, Box<dyn std::error::Error>> {
    if let Ok(cargo_target_tmpdir) = env::var("CARGO_TARGET_TMPDIR") {
        fs::create_dir_all(&cargo_target_tmpdir)?;
        Ok(TempDir::new_in(cargo_target_tmpdir)?)
    } else {
        Ok(TempDir::new()?)
    }
}

/// Helper function to create a test CSV file with custom data
pub fn create_custom_csv(
    dir: &Path,
    filename: &str,
    content: &str,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Helper function to create the standard people file used across tests
pub fn prepare_people_file(dir: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    create_custom_csv(dir, "people.csv", "id,name,age\n1,Alice,30\n2,Bob,notanumber\n")
}

/// Convert a file into an in-memory script
pub fn convert_to_string(
    config: &ConvertConfig,
    path: &Path,
    table_name: &str,
) -> Result<(String, ConversionSummary), Box<dyn std::error::Error>> {
    let mut out = Vec::<u8>::new();
    let summary = convert_file(config, path, table_name, &mut out)?;
    Ok((String::from_utf8(out)?, summary))
}

/// Numeric CSV with a single `n` column holding 1..=rows
pub fn numbered_csv(rows: usize) -> String {
    let mut content = String::from("n\n");
    for i in 1..=rows {
        content.push_str(&format!("{i}\n"));
    }
    content
}
