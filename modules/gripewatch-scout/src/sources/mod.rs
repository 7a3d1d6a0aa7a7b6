// Source adapters: one per external service, all behind SourceAdapter.
//
// Each adapter widens recall with derived search terms, swallows per-term
// failures, applies its own thresholds, dedups by URL and stops once it has
// `max_results` candidates. It returns Err only when every term failed.

pub mod reddit;
pub mod review_site;
pub mod stackexchange;
pub mod web;

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use gripewatch_common::{Candidate, Query, ScoutConfig, SourceId, SourceKind};

use crate::error::SourceError;
use crate::fetcher::ContentFetcher;
use crate::scraper::PageScraper;

pub use reddit::RedditAdapter;
pub use review_site::{ReviewSite, ReviewSiteAdapter, SITEJABBER, TRUSTPILOT};
pub use stackexchange::StackExchangeAdapter;
pub use web::WebSearchAdapter;

#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Short identifier used in logs (e.g. `"reddit"`).
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Turn `query` into at most `max_results` candidates.
    async fn fetch(&self, query: &Query, max_results: usize) -> Result<Vec<Candidate>, SourceError>;
}

/// Build the enabled adapters, highest priority first.
pub fn build_adapters(
    config: &ScoutConfig,
    fetcher: Arc<dyn ContentFetcher>,
    scraper: Arc<dyn PageScraper>,
) -> Vec<Arc<dyn SourceAdapter>> {
    config
        .sources
        .iter()
        .map(|id| -> Arc<dyn SourceAdapter> {
            match id {
                SourceId::Reddit => Arc::new(RedditAdapter::new(fetcher.clone())),
                SourceId::StackExchange => Arc::new(StackExchangeAdapter::new(
                    fetcher.clone(),
                    &config.stackexchange_site,
                )),
                SourceId::Trustpilot => Arc::new(ReviewSiteAdapter::new(
                    TRUSTPILOT,
                    fetcher.clone(),
                    scraper.clone(),
                )),
                SourceId::Sitejabber => Arc::new(ReviewSiteAdapter::new(
                    SITEJABBER,
                    fetcher.clone(),
                    scraper.clone(),
                )),
                SourceId::Web => Arc::new(WebSearchAdapter::new(fetcher.clone(), scraper.clone())),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Collector: per-fetch accumulation shared by all adapters
// ---------------------------------------------------------------------------

/// Accumulates one adapter's candidates: URL dedup, the result cap, and
/// bookkeeping of failed terms.
pub(crate) struct Collector<'a> {
    source: &'a str,
    max_results: usize,
    seen: HashSet<String>,
    items: Vec<Candidate>,
    terms_tried: usize,
    terms_failed: usize,
    last_error: Option<SourceError>,
}

impl<'a> Collector<'a> {
    pub(crate) fn new(source: &'a str, max_results: usize) -> Self {
        Self {
            source,
            max_results,
            seen: HashSet::new(),
            items: Vec::new(),
            terms_tried: 0,
            terms_failed: 0,
            last_error: None,
        }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.items.len() >= self.max_results
    }

    pub(crate) fn remaining(&self) -> usize {
        self.max_results.saturating_sub(self.items.len())
    }

    pub(crate) fn has_seen(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Accept `candidate` unless the collector is full, its URL is empty or
    /// already present. Returns whether it was kept.
    pub(crate) fn push(&mut self, candidate: Candidate) -> bool {
        if self.is_full() || candidate.url.is_empty() {
            return false;
        }
        if !self.seen.insert(candidate.url.clone()) {
            debug!(source = self.source, url = candidate.url.as_str(), "Duplicate within source");
            return false;
        }
        self.items.push(candidate);
        true
    }

    /// Record the outcome of one term's lookup. Errors are logged and
    /// otherwise count as zero results for that term.
    pub(crate) fn finish_term(&mut self, term: &str, outcome: Result<(), SourceError>) {
        self.terms_tried += 1;
        if let Err(e) = outcome {
            warn!(source = self.source, term, error = %e, "Search term failed, skipping");
            self.terms_failed += 1;
            self.last_error = Some(e);
        }
    }

    /// Candidates in discovery order. Err only when nothing was collected and
    /// every term that was tried failed.
    pub(crate) fn finish(self) -> Result<Vec<Candidate>, SourceError> {
        if self.items.is_empty() && self.all_failed() {
            if let Some(e) = self.last_error {
                return Err(e);
            }
        }
        Ok(self.items)
    }

    fn all_failed(&self) -> bool {
        self.terms_tried > 0 && self.terms_failed == self.terms_tried
    }
}

/// First heading or non-empty line of a scraped page, used as a title.
pub(crate) fn page_title(text: &str) -> Option<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(|line| gripewatch_common::excerpt(line, 120))
}
