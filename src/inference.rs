//! Column type inference
//!
//! Each sampled value is classified into one semantic bucket, the buckets
//! are tallied, and the majority bucket wins if it covers at least 80% of
//! the non-empty values. Anything less is typed as TEXT so that mixed
//! columns never lose data on load.
//!
//! Classification precedence (first match wins):
//! 1. boolean token (`true`, `false`, `yes`, `no`, `sim`, `não`, `0`, `1`)
//! 2. leading zero on a value longer than one character → TEXT
//! 3. digits with at most one `,` or `.` → INTEGER or FLOAT
//! 4. ISO `YYYY-MM-DD` → DATE
//! 5. any other day-first date, datetime (with or without an offset),
//!    year-month or time → DATE
//! 6. TEXT

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;

use crate::dialect::Dialect;

/// Tokens recognized as booleans, compared after lower-casing
const BOOLEAN_TOKENS: [&str; 8] = ["true", "false", "yes", "no", "sim", "não", "0", "1"];

/// Minimum share of the majority bucket, as a fraction `NUM / DEN`
const MAJORITY_NUM: usize = 4;
const MAJORITY_DEN: usize = 5;

/// Day-first date layouts, tried before the month-first fallbacks
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
    "%b %d %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    // month-first, only reached when the day-first reading is impossible
    "%m/%d/%Y",
    "%m-%d-%Y",
];

// Values are lower-cased before classification, hence the `t` separator
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dt%H:%M:%S",
    "%Y-%m-%dt%H:%M:%S%.f",
    "%Y-%m-%dt%H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

const ZONED_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dt%H:%M:%S%z",
    "%Y-%m-%dt%H:%M:%S%.f%z",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

fn iso_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("ISO date pattern is valid"))
}

fn year_month() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{1,2}$").expect("year-month pattern is valid"))
}

/// Semantic classification of a column, before dialect rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Boolean,
    Date,
    Integer,
    Float,
    Text,
}

impl SemanticType {
    /// All buckets in tie-breaking order
    pub const ALL: [SemanticType; 5] = [
        SemanticType::Boolean,
        SemanticType::Date,
        SemanticType::Integer,
        SemanticType::Float,
        SemanticType::Text,
    ];

    fn index(self) -> usize {
        match self {
            SemanticType::Boolean => 0,
            SemanticType::Date => 1,
            SemanticType::Integer => 2,
            SemanticType::Float => 3,
            SemanticType::Text => 4,
        }
    }

    /// Whether values of this type are emitted as bare numeric literals
    pub fn is_numeric(self) -> bool {
        matches!(self, SemanticType::Integer | SemanticType::Float)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SemanticType::Boolean => "boolean",
            SemanticType::Date => "date",
            SemanticType::Integer => "integer",
            SemanticType::Float => "float",
            SemanticType::Text => "text",
        };
        f.write_str(name)
    }
}

/// Per-bucket counts for one column sample
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeTally {
    counts: [usize; 5],
    total: usize,
}

impl TypeTally {
    /// Classify and count every non-empty value
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tally = TypeTally::default();
        for value in values {
            let value = value.as_ref().trim();
            if value.is_empty() {
                continue;
            }
            tally.add(classify_value(&value.to_lowercase()));
        }
        tally
    }

    fn add(&mut self, semantic: SemanticType) {
        self.counts[semantic.index()] += 1;
        self.total += 1;
    }

    /// Number of values counted for a bucket
    pub fn count(&self, semantic: SemanticType) -> usize {
        self.counts[semantic.index()]
    }

    /// Number of non-empty values counted
    pub fn total(&self) -> usize {
        self.total
    }

    /// The winning bucket, or TEXT when nothing reaches the majority share
    pub fn resolve(&self) -> SemanticType {
        if self.total == 0 {
            return SemanticType::Text;
        }

        let mut best = SemanticType::Boolean;
        for semantic in SemanticType::ALL {
            if self.count(semantic) > self.count(best) {
                best = semantic;
            }
        }

        if self.count(best) * MAJORITY_DEN >= self.total * MAJORITY_NUM {
            best
        } else {
            SemanticType::Text
        }
    }
}

/// Classify a single trimmed, lower-cased, non-empty value
pub fn classify_value(value: &str) -> SemanticType {
    if BOOLEAN_TOKENS.contains(&value) {
        return SemanticType::Boolean;
    }

    // Identifier-like codes such as "007" must not be coerced to numbers
    if value.starts_with('0') && value.chars().count() > 1 {
        return SemanticType::Text;
    }

    if is_decimal_number(value) {
        return if value.contains(['.', ',']) {
            SemanticType::Float
        } else {
            SemanticType::Integer
        };
    }

    if iso_date().is_match(value) || parses_as_date(value) {
        return SemanticType::Date;
    }

    SemanticType::Text
}

/// Digits with at most one decimal separator, either `,` or `.`
fn is_decimal_number(value: &str) -> bool {
    let unified = value.replace(',', ".");
    let digits = unified.replacen('.', "", 1);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

fn parses_as_date(value: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
        || parses_as_zoned_datetime(value)
        || parses_as_year_month(value)
        || TIME_FORMATS
            .iter()
            .any(|fmt| NaiveTime::parse_from_str(value, fmt).is_ok())
}

/// RFC 3339 and offset datetimes, e.g. `2024-03-15t10:30:00z`
fn parses_as_zoned_datetime(value: &str) -> bool {
    DateTime::parse_from_rfc3339(&value.to_uppercase()).is_ok()
        || ZONED_DATETIME_FORMATS
            .iter()
            .any(|fmt| DateTime::parse_from_str(value, fmt).is_ok())
}

/// `YYYY-MM` with the day left out
fn parses_as_year_month(value: &str) -> bool {
    year_month().is_match(value)
        && NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").is_ok()
}

/// Infer the semantic type of a column from its sampled values
pub fn infer_semantic<I, S>(values: I) -> SemanticType
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    TypeTally::from_values(values).resolve()
}

/// Infer the dialect-specific SQL type name of a column from its sampled values
///
/// # Example
/// ```
/// # use csv2sql::dialect::Dialect;
/// # use csv2sql::inference::infer;
/// assert_eq!(infer(["10", "20", "30"], Dialect::Postgres), "INTEGER");
/// assert_eq!(infer(["1.5", "2,25"], Dialect::Postgres), "REAL");
/// assert_eq!(infer(["10", "abc"], Dialect::MySql), "TEXT");
/// ```
pub fn infer<I, S>(values: I, dialect: Dialect) -> &'static str
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    dialect.sql_type_name(infer_semantic(values))
}
