// Reddit site-wide search via the public JSON listing endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use gripewatch_common::{excerpt, normalize, Candidate, Query, SourceKind};

use super::{Collector, SourceAdapter};
use crate::error::SourceError;
use crate::fetcher::{get_json, ContentFetcher};

const SEARCH_ENDPOINT: &str = "https://www.reddit.com/search.json";

const TERM_SUFFIXES: &[&str] = &["problem", "issue", "complaint", "scam"];

/// Posts requested per search term.
const POSTS_PER_TERM: usize = 8;
/// Self-text must be longer than this to be worth showing.
const MIN_SELFTEXT_CHARS: usize = 50;
const EXCERPT_CHARS: usize = 180;

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RedditPost,
}

#[derive(Debug, Deserialize)]
struct RedditPost {
    #[serde(default)]
    title: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    permalink: String,
}

pub struct RedditAdapter {
    fetcher: Arc<dyn ContentFetcher>,
}

impl RedditAdapter {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self { fetcher }
    }

    /// Search URL for one derived term.
    pub fn search_url(term: &str) -> Result<String, SourceError> {
        let limit = POSTS_PER_TERM.to_string();
        let url = url::Url::parse_with_params(
            SEARCH_ENDPOINT,
            &[
                ("q", term),
                ("limit", limit.as_str()),
                ("sort", "relevance"),
                ("raw_json", "1"),
            ],
        )?;
        Ok(url.to_string())
    }

    async fn search_term(&self, term: &str, collector: &mut Collector<'_>) -> Result<(), SourceError> {
        let url = Self::search_url(term)?;
        let listing: Listing = get_json(self.fetcher.as_ref(), &url).await?;

        let total = listing.data.children.len();
        let mut kept = 0usize;
        for child in listing.data.children {
            if collector.is_full() {
                break;
            }
            if let Some(candidate) = to_candidate(child.data) {
                if collector.push(candidate) {
                    kept += 1;
                }
            }
        }

        info!(term, total, kept, "reddit: term searched");
        Ok(())
    }
}

fn to_candidate(post: RedditPost) -> Option<Candidate> {
    if post.permalink.is_empty() || post.selftext.chars().count() <= MIN_SELFTEXT_CHARS {
        return None;
    }
    Some(Candidate {
        title: normalize(&post.title),
        excerpt: excerpt(&post.selftext, EXCERPT_CHARS),
        url: format!("https://reddit.com{}", post.permalink),
        source: SourceKind::Forum,
    })
}

#[async_trait]
impl SourceAdapter for RedditAdapter {
    fn name(&self) -> &str {
        "reddit"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Forum
    }

    async fn fetch(&self, query: &Query, max_results: usize) -> Result<Vec<Candidate>, SourceError> {
        let mut collector = Collector::new(self.name(), max_results);

        for term in query.with_suffixes(TERM_SUFFIXES) {
            if collector.is_full() {
                break;
            }
            let outcome = self.search_term(&term, &mut collector).await;
            collector.finish_term(&term, outcome);
        }

        collector.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(selftext: &str, permalink: &str) -> RedditPost {
        RedditPost {
            title: "Acme  problem".to_string(),
            selftext: selftext.to_string(),
            permalink: permalink.to_string(),
        }
    }

    #[test]
    fn short_selftext_is_dropped() {
        assert!(to_candidate(post("too short", "/r/x/comments/1/a/")).is_none());
        assert!(to_candidate(post(&"x".repeat(50), "/r/x/comments/1/a/")).is_none());
        assert!(to_candidate(post(&"x".repeat(51), "/r/x/comments/1/a/")).is_some());
    }

    #[test]
    fn missing_permalink_is_dropped() {
        assert!(to_candidate(post(&"x".repeat(80), "")).is_none());
    }

    #[test]
    fn candidate_fields() {
        let c = to_candidate(post(&"word ".repeat(100), "/r/acme/comments/abc/title/")).unwrap();
        assert_eq!(c.url, "https://reddit.com/r/acme/comments/abc/title/");
        assert_eq!(c.title, "Acme problem");
        assert!(c.excerpt.chars().count() <= EXCERPT_CHARS);
        assert_eq!(c.source, SourceKind::Forum);
    }

    #[test]
    fn search_url_encodes_term() {
        let url = RedditAdapter::search_url("Acme Corp problem").unwrap();
        assert_eq!(
            url,
            "https://www.reddit.com/search.json?q=Acme+Corp+problem&limit=8&sort=relevance&raw_json=1"
        );
    }
}
