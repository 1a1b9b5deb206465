//! Console preview of the source data
//!
//! Shows the header and the first few data rows, fields joined by ` | `,
//! so the user can check that the separator was detected correctly.

use crate::error::ConvertResult;
use crate::source::CsvSource;

/// Render at most `limit` lines, the header row counting as the first
///
/// The header is always shown, even when `limit` is zero.
pub fn render_preview(source: &CsvSource, limit: usize) -> ConvertResult<String> {
    let mut lines = vec![source.headers().join(" | ")];
    for row in source.rows()?.take(limit.saturating_sub(1)) {
        lines.push(row?.join(" | "));
    }
    Ok(lines.join("\n"))
}
