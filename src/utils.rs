//! Small string helpers shared by the adapters.
//!
//! - Truncation of response bodies for log lines and error messages
//! - Tag stripping for provider snippets that embed HTML markup

use scraper::Html;

/// Truncate a string for logging purposes.
///
/// Long strings are cut at a character boundary at or below `max` bytes and
/// get an ellipsis plus the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Reduce an HTML fragment to its text, collapsing runs of whitespace.
///
/// DuckDuckGo highlights query terms with `<b>` and escapes quotes as
/// entities; both are resolved here.
pub fn strip_html(fragment: &str) -> String {
    if !fragment.contains('<') && !fragment.contains('&') {
        return fragment.trim().to_string();
    }
    let parsed = Html::parse_fragment(fragment);
    let text = parsed.root_element().text().collect::<String>();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
