//! HTML helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref WS_RE: Regex = Regex::new(r"\s+").unwrap();
    static ref PARAGRAPH_RE: Regex = Regex::new(r"(?is)<p\b[^>]*>.*?</p>").unwrap();
    static ref BLANK_RE: Regex = Regex::new(r"\n{2,}").unwrap();
}

/// Replace tags with spaces and collapse the remaining whitespace
pub fn strip_html(text: &str) -> String {
    let stripped = TAG_RE.replace_all(text, " ");
    WS_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Escape text for embedding in HTML or XML markup
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Extract the leading paragraphs of a rendered HTML fragment
///
/// Takes the first `count` `<p>` blocks. Content without paragraph markup
/// falls back to splitting on blank lines after tags are removed.
pub fn excerpt_html(content: &str, count: usize) -> String {
    if content.is_empty() {
        return String::new();
    }

    let paragraphs: Vec<&str> = PARAGRAPH_RE
        .find_iter(content)
        .map(|m| m.as_str())
        .collect();
    if !paragraphs.is_empty() {
        return paragraphs
            .into_iter()
            .take(count)
            .collect::<String>()
            .trim()
            .to_string();
    }

    let text = TAG_RE.replace_all(content, "\n");
    let chunks: Vec<&str> = BLANK_RE
        .split(&text)
        .map(|chunk| chunk.trim())
        .filter(|chunk| !chunk.is_empty())
        .collect();
    chunks
        .into_iter()
        .take(count)
        .collect::<Vec<_>>()
        .join("\n\n")
}
