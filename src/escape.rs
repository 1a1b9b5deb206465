//! SQL literal escaping
//!
//! Pure functions turning raw field text into literals that can be placed
//! in a VALUES tuple.

use crate::dialect::Dialect;
use crate::inference::SemanticType;

/// Whether a trimmed value is digits with at most one period
fn is_numeric_literal(value: &str) -> bool {
    let digits = value.replacen('.', "", 1);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Quote a value as a single-quoted string literal
///
/// The value is trimmed and embedded single quotes are escaped with the
/// dialect's rule. No other character is touched.
pub fn quote_literal(raw: &str, dialect: Dialect) -> String {
    format!("'{}'", dialect.escape_string_body(raw.trim()))
}

/// Escape a raw field value into a SQL literal
///
/// Values that are digits with at most one period are emitted unquoted;
/// everything else becomes a quoted string literal.
///
/// # Arguments
/// * `raw` - Field text as read from the source file
/// * `dialect` - Target dialect, which decides the quote escaping rule
///
/// # Example
/// ```
/// # use csv2sql::dialect::Dialect;
/// # use csv2sql::escape::escape;
/// assert_eq!(escape(" 42 ", Dialect::Postgres), "42");
/// assert_eq!(escape("O'Brien", Dialect::Postgres), "'O''Brien'");
/// ```
pub fn escape(raw: &str, dialect: Dialect) -> String {
    let value = raw.trim();
    if is_numeric_literal(value) {
        value.to_string()
    } else {
        quote_literal(value, dialect)
    }
}

/// Escape a value for a column of a known semantic type
///
/// Only INTEGER and FLOAT columns get bare numeric literals. Every other
/// column quotes its values, so `007` in a TEXT column keeps its zeros.
pub fn escape_for_column(raw: &str, semantic: SemanticType, dialect: Dialect) -> String {
    if semantic.is_numeric() {
        escape(raw, dialect)
    } else {
        quote_literal(raw, dialect)
    }
}
