//! Field delimiter detection and parsing
//!
//! The detector looks at the first line of a file only and picks the
//! candidate separator that splits it into the most fields. Multi-line
//! quoted fields or an unrepresentative first line can mislead it; the
//! caller can always override detection with an explicit separator.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{ConvertError, ConvertResult};

/// Candidate field separators, in tie-breaking order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// Horizontal tab
    Tab,
    /// `|`
    Pipe,
    /// Any other single-byte separator given explicitly by the user
    Other(u8),
}

impl Delimiter {
    /// Detection candidates; earlier entries win ties
    pub const CANDIDATES: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Tab,
        Delimiter::Pipe,
    ];

    /// The separator as a byte, as expected by `csv::ReaderBuilder::delimiter`
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Semicolon => b';',
            Delimiter::Tab => b'\t',
            Delimiter::Pipe => b'|',
            Delimiter::Other(b) => b,
        }
    }

    /// The separator as a character
    pub fn as_char(self) -> char {
        self.as_byte() as char
    }

    /// Parse a user-supplied separator
    ///
    /// Accepts exactly one ASCII character, or the two-character escape `\t`
    /// for a tab (shells make a literal tab awkward to type).
    ///
    /// # Arguments
    /// * `separator` - Separator text from the command line or config file
    ///
    /// # Returns
    /// * `Ok(Delimiter)` - The parsed separator
    /// * `Err(ConvertError::InvalidDelimiter)` - If the text is not a single character
    pub fn from_user(separator: &str) -> ConvertResult<Self> {
        if separator == "\\t" {
            return Ok(Delimiter::Tab);
        }
        match separator.as_bytes() {
            [b','] => Ok(Delimiter::Comma),
            [b';'] => Ok(Delimiter::Semicolon),
            [b'\t'] => Ok(Delimiter::Tab),
            [b'|'] => Ok(Delimiter::Pipe),
            [b] if b.is_ascii() && *b != b'\n' && *b != b'\r' && *b != b'"' => {
                Ok(Delimiter::Other(*b))
            }
            _ => Err(ConvertError::InvalidDelimiter(separator.to_string())),
        }
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Comma => write!(f, "comma"),
            Delimiter::Semicolon => write!(f, "semicolon"),
            Delimiter::Tab => write!(f, "tab"),
            Delimiter::Pipe => write!(f, "pipe"),
            Delimiter::Other(b) => write!(f, "'{}'", *b as char),
        }
    }
}

/// Choose the most plausible separator for a single line
///
/// Splits the line by every candidate and keeps the one producing the
/// greatest field count. The first maximum in [`Delimiter::CANDIDATES`]
/// wins, so a line without any separator yields [`Delimiter::Comma`].
pub fn detect_delimiter(first_line: &str) -> Delimiter {
    let line = first_line.trim_end_matches(['\r', '\n']);
    let mut best = Delimiter::Comma;
    let mut best_count = 0;

    for candidate in Delimiter::CANDIDATES {
        let count = line.split(candidate.as_char()).count();
        // Strictly greater keeps the earliest candidate on ties
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    best
}

/// Detect the separator of a file by reading its first line
///
/// Only the first line is read; the file is closed before returning.
pub fn detect_delimiter_in(path: &Path) -> ConvertResult<Delimiter> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut first_line = String::new();
    reader.read_line(&mut first_line)?;

    let delimiter = detect_delimiter(&first_line);
    debug!(path = %path.display(), %delimiter, "detected field delimiter");
    Ok(delimiter)
}
