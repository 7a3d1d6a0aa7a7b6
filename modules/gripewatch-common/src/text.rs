use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Collapse every whitespace run to a single space and trim both ends.
/// Case is preserved; matching code case-folds on its own.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize `text` and keep at most `max_chars` characters.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let normalized = normalize(text);
    match normalized.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => normalized[..byte_idx].trim_end().to_string(),
        None => normalized,
    }
}

/// Drop HTML tags, decode the common entities public APIs emit, normalize.
pub fn strip_markup(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, " ");
    let decoded = without_tags
        .replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    normalize(&decoded)
}
