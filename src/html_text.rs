// src/html_text.rs
use scraper::Html;

/// Descriptions are cut at this many characters before the ellipsis marker.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Convert an HTML job description into plain text.
///
/// Tags are dropped, each line is trimmed, runs of blank lines collapse to a
/// single newline and the result is truncated to [`MAX_DESCRIPTION_CHARS`].
/// Malformed HTML degrades to best-effort extraction and never fails.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let raw: String = fragment.root_element().text().collect();
    truncate_chars(&collapse_blank_lines(&raw), MAX_DESCRIPTION_CHARS)
}

/// Truncate to `max_chars` characters, appending `...` when anything was cut.
/// Operates on character boundaries, not bytes.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}

fn collapse_blank_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
