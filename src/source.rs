//! Delimited source file access
//!
//! This module reads the source file with the `csv` crate. The file is
//! scanned twice: once for the header and the bounded type-inference
//! sample, and once more for the full row stream that feeds the INSERT
//! generator. Every scan opens its own handle, which is closed when the
//! reader is dropped, so early returns never leak the file.
//!
//! Records are read in flexible mode: rows with the wrong number of fields
//! are returned as they are and the generator decides to skip them.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::delimiter::Delimiter;
use crate::error::{ConvertError, ConvertResult};

/// A delimited file with its header row already read
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
    delimiter: Delimiter,
    headers: Vec<String>,
}

impl CsvSource {
    /// Open a delimited file and read its header row
    ///
    /// # Arguments
    /// * `path` - Path of the source file
    /// * `delimiter` - Field separator to parse with
    ///
    /// # Returns
    /// * `Ok(CsvSource)` - Source ready for sampling and streaming
    /// * `Err(ConvertError::EmptyHeader)` - If the file has no header or only empty header cells
    /// * `Err` - If the file cannot be opened or decoded
    pub fn open(path: &Path, delimiter: Delimiter) -> ConvertResult<Self> {
        let mut records = open_reader(path, delimiter)?.into_records();

        let header = match records.next() {
            Some(record) => record?,
            None => return Err(ConvertError::EmptyHeader(path.display().to_string())),
        };

        let mut headers: Vec<String> = header.iter().map(str::to_string).collect();
        if let Some(first) = headers.first_mut() {
            if let Some(stripped) = first.strip_prefix('\u{feff}') {
                *first = stripped.to_string();
            }
        }
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ConvertError::EmptyHeader(path.display().to_string()));
        }

        debug!(path = %path.display(), columns = headers.len(), "read header row");
        Ok(CsvSource {
            path: path.to_path_buf(),
            delimiter,
            headers,
        })
    }

    /// Path of the source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Separator used to parse the file
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Header row cells as they appear in the file
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Read at most `limit` data rows following the header
    ///
    /// Rows of any length are returned; only `limit` rows are ever held in
    /// memory.
    pub fn sample(&self, limit: usize) -> ConvertResult<Vec<Vec<String>>> {
        self.rows()?.take(limit).collect()
    }

    /// Stream every data row following the header
    pub fn rows(&self) -> ConvertResult<SourceRows> {
        let mut records = open_reader(&self.path, self.delimiter)?.into_records();
        // Header row, already validated by `open`
        if let Some(header) = records.next() {
            header?;
        }
        Ok(SourceRows { records })
    }
}

fn open_reader(path: &Path, delimiter: Delimiter) -> ConvertResult<csv::Reader<BufReader<File>>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    Ok(csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .from_reader(reader))
}

/// Iterator over the data rows of a [`CsvSource`]
pub struct SourceRows {
    records: csv::StringRecordsIntoIter<BufReader<File>>,
}

impl Iterator for SourceRows {
    type Item = ConvertResult<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(|result| {
            result
                .map(|record| record.iter().map(str::to_string).collect())
                .map_err(ConvertError::from)
        })
    }
}
