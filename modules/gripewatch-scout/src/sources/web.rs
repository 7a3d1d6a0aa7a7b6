// Generic web search: DuckDuckGo's HTML endpoint for discovery, then
// page-to-text on every hit. Discovery-only and the most expensive source per
// result, so it sits last in priority order.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::info;

use gripewatch_common::{complaint_snippet, strip_markup, Candidate, Query, SourceKind, MAX_EXCERPT_CHARS};

use super::{Collector, SourceAdapter};
use crate::error::SourceError;
use crate::fetcher::ContentFetcher;
use crate::scraper::PageScraper;

const SEARCH_ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const TERM_SUFFIXES: &[&str] = &["complaints", "scam"];

/// Result links followed per search term.
const MAX_RESULTS_PER_TERM: usize = 8;
const MIN_PARAGRAPH_CHARS: usize = 60;

static RESULT_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a\s([^>]*class="[^"]*result__a[^"]*"[^>]*)>(.*?)</a>"#).expect("valid regex")
});
static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*=\s*"([^"]+)""#).expect("valid regex"));

/// One organic result from the search page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

/// Parse organic results out of DuckDuckGo's HTML results page, in page
/// order. Redirect links are unwrapped; ads and non-http targets are skipped.
pub fn parse_search_results(html: &str, cap: usize) -> Vec<SearchHit> {
    RESULT_ANCHOR_RE
        .captures_iter(html)
        .filter_map(|cap| {
            let href = HREF_RE.captures(&cap[1])?.get(1)?.as_str().to_string();
            let url = resolve_result_link(&href)?;
            Some(SearchHit {
                url,
                title: strip_markup(&cap[2]),
            })
        })
        .take(cap)
        .collect()
}

/// `//duckduckgo.com/l/?uddg=<encoded target>&rut=...` → target.
fn resolve_result_link(href: &str) -> Option<String> {
    let href = href.replace("&amp;", "&");
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href
    };
    let parsed = url::Url::parse(&absolute).ok()?;

    let target = if parsed.domain().is_some_and(|d| d.ends_with("duckduckgo.com")) {
        if parsed.path() != "/l/" {
            return None;
        }
        let (_, value) = parsed.query_pairs().find(|(k, _)| k == "uddg")?;
        url::Url::parse(&value).ok()?
    } else {
        parsed
    };

    match target.scheme() {
        "http" | "https" => Some(target.to_string()),
        _ => None,
    }
}

pub struct WebSearchAdapter {
    fetcher: Arc<dyn ContentFetcher>,
    scraper: Arc<dyn PageScraper>,
}

impl WebSearchAdapter {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, scraper: Arc<dyn PageScraper>) -> Self {
        Self { fetcher, scraper }
    }

    pub fn search_url(term: &str) -> Result<String, SourceError> {
        let url = url::Url::parse_with_params(SEARCH_ENDPOINT, &[("q", term)])?;
        Ok(url.to_string())
    }

    async fn search_term(&self, term: &str, collector: &mut Collector<'_>) -> Result<(), SourceError> {
        let url = Self::search_url(term)?;
        let html = self.fetcher.get(&url).await?;
        let hits = parse_search_results(&html, MAX_RESULTS_PER_TERM);

        let mut kept = 0usize;
        for hit in &hits {
            if collector.is_full() {
                break;
            }
            if collector.has_seen(&hit.url) {
                continue;
            }
            let Some(text) = self.scraper.scrape_text(&hit.url).await else {
                continue;
            };
            let Some(excerpt) = complaint_snippet(&text, MIN_PARAGRAPH_CHARS, MAX_EXCERPT_CHARS) else {
                continue;
            };
            let pushed = collector.push(Candidate {
                title: hit.title.clone(),
                excerpt,
                url: hit.url.clone(),
                source: SourceKind::Web,
            });
            if pushed {
                kept += 1;
            }
        }

        info!(term, hits = hits.len(), kept, "web: term searched");
        Ok(())
    }
}

#[async_trait]
impl SourceAdapter for WebSearchAdapter {
    fn name(&self) -> &str {
        "web"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Web
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
