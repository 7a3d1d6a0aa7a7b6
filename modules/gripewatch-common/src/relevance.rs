// Keyword gate deciding whether a piece of text reads like a complaint.
//
// Overlaps with the category taxonomy on purpose but is broader: a snippet can
// be complaint-like without matching any specific category.

use crate::text::{excerpt, normalize};

/// Substrings that mark text as complaint-like. Matched case-insensitively.
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    "problem",
    "issue",
    "complaint",
    "scam",
    "fraud",
    "refund",
    "broken",
    "terrible",
    "worst",
    "awful",
    "ripoff",
    "rip off",
    "overcharged",
    "disappointed",
    "avoid",
    "never again",
    "lawsuit",
    "unresponsive",
];

static STANDARD: RelevanceFilter = RelevanceFilter {
    keywords: RELEVANCE_KEYWORDS,
};

#[derive(Debug, Clone, Copy)]
pub struct RelevanceFilter {
    keywords: &'static [&'static str],
}

impl RelevanceFilter {
    /// The process-wide filter built from [`RELEVANCE_KEYWORDS`].
    pub fn standard() -> &'static RelevanceFilter {
        &STANDARD
    }

    pub fn new(keywords: &'static [&'static str]) -> Self {
        Self { keywords }
    }

    pub fn is_complaint_like(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let folded = text.to_lowercase();
        self.keywords.iter().any(|kw| folded.contains(kw))
    }

    /// First paragraph of `text` that is long enough and complaint-like,
    /// cut down to an excerpt.
    pub fn complaint_snippet(&self, text: &str, min_chars: usize, max_chars: usize) -> Option<String> {
        text.split('\n')
            .map(normalize)
            .find(|para| para.chars().count() >= min_chars && self.is_complaint_like(para))
            .map(|para| excerpt(&para, max_chars))
    }
}

/// Shorthand for `RelevanceFilter::standard().is_complaint_like(text)`.
pub fn is_complaint_like(text: &str) -> bool {
    RelevanceFilter::standard().is_complaint_like(text)
}

/// Shorthand for `RelevanceFilter::standard().complaint_snippet(..)`.
pub fn complaint_snippet(text: &str, min_chars: usize, max_chars: usize) -> Option<String> {
    RelevanceFilter::standard().complaint_snippet(text, min_chars, max_chars)
}
