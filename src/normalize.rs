//! Identifier normalization
//!
//! Turns header cells and table names into identifiers that can be used
//! inside quoted SQL identifiers without further escaping.

use std::sync::OnceLock;

use regex::Regex;

fn separator_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s\-.]+").expect("separator pattern is valid"))
}

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w]").expect("word pattern is valid"))
}

/// Normalize arbitrary text into a SQL identifier
///
/// The text is trimmed and lower-cased, every run of whitespace, hyphens
/// and periods becomes a single underscore, and anything that is not a
/// letter, digit or underscore is dropped. Leading and trailing
/// underscores are stripped.
///
/// Letters outside ASCII are kept (`"Ação"` becomes `"ação"`).
///
/// # Arguments
/// * `text` - Raw header cell or table name
///
/// # Returns
/// The normalized identifier, possibly empty
///
/// # Example
/// ```
/// # use csv2sql::normalize::normalize_identifier;
/// assert_eq!(normalize_identifier("My Col-1.Name"), "my_col_1_name");
/// ```
pub fn normalize_identifier(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let joined = separator_runs().replace_all(&lowered, "_");
    let cleaned = non_word().replace_all(&joined, "");
    cleaned.trim_matches('_').to_string()
}
