use std::fmt;

use serde::{Deserialize, Serialize};

use crate::text::{excerpt, normalize};

/// Max characters kept in a candidate excerpt.
pub const MAX_EXCERPT_CHARS: usize = 200;

/// Default cap on the number of candidates a single search returns.
pub const DEFAULT_MAX_RESULTS: usize = 25;

// --- Query ---

/// A whitespace-normalized, non-empty search query.
///
/// The only way to build one is through [`Query::parse`], so adapters never
/// see raw user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Normalize `raw` and wrap it. Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = normalize(raw);
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `"{query} {suffix}"` for each suffix, in order.
    pub fn with_suffixes(&self, suffixes: &[&str]) -> Vec<String> {
        suffixes
            .iter()
            .map(|suffix| format!("{} {}", self.0, suffix))
            .collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// --- Source ---

/// Where a candidate came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Forum,
    QaAggregator,
    Web,
    ReviewSite(String),
    /// Synthetic entries produced by the pipeline itself.
    System,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Forum => f.write_str("Forum"),
            SourceKind::QaAggregator => f.write_str("Q&A"),
            SourceKind::Web => f.write_str("Web"),
            SourceKind::ReviewSite(name) => f.write_str(name),
            SourceKind::System => f.write_str("System"),
        }
    }
}

// --- Candidate ---

/// One retrieved item before classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub title: String,
    pub excerpt: String,
    pub url: String,
    pub source: SourceKind,
}

impl Candidate {
    /// The informational entry returned when no source produced anything.
    pub fn no_results(query: &Query) -> Self {
        Self {
            title: "No complaints found".to_string(),
            excerpt: excerpt(&format!("No complaints found for \"{query}\"."), MAX_EXCERPT_CHARS),
            url: String::new(),
            source: SourceKind::System,
        }
    }

    /// The empty-URL sentinel never participates in URL dedup.
    pub fn is_sentinel(&self) -> bool {
        self.url.is_empty()
    }

    /// Text fed to the classifier: title and excerpt joined by a space.
    pub fn classification_text(&self) -> String {
        format!("{} {}", self.title, self.excerpt)
    }
}

// --- Classified result ---

/// A candidate tagged with a taxonomy category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintResult {
    #[serde(flatten)]
    pub candidate: Candidate,
    pub category: String,
}

impl ComplaintResult {
    pub fn new(candidate: Candidate, category: impl Into<String>) -> Self {
        Self {
            candidate,
            category: category.into(),
        }
    }
}
