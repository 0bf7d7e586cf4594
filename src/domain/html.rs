//! Escaping helpers for markup and CSS identifiers.

use std::sync::LazyLock;

use regex::Regex;

static INVALID_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-_:.]+").expect("static regex"));
static REPEATED_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("static regex"));

/// Convert a raw value into a string usable as an HTML id or CSS class fragment.
///
/// Runs of characters outside `[A-Za-z0-9_:.-]` become a single `_`,
/// repeated underscores collapse and leading/trailing underscores are trimmed.
///
/// # Examples
/// ```
/// use cmstree::domain::html_id;
///
/// assert_eq!(html_id("App\\Pages\\Article"), "App_Pages_Article");
/// assert_eq!(html_id("Page"), "Page");
/// ```
pub fn html_id(raw: &str) -> String {
    let replaced = INVALID_ID_CHARS.replace_all(raw, "_");
    let collapsed = REPEATED_UNDERSCORES.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
