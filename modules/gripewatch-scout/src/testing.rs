// Test mocks for the complaint pipeline.
//
// One mock per trait boundary:
// - MockFetcher (ContentFetcher): URL to body map, records requests
// - MockPageScraper (PageScraper): URL to page text map
// - MockAdapter / FailingAdapter / HangingAdapter (SourceAdapter)
//
// Plus `candidate()` for building fixtures.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use gripewatch_common::{Candidate, Query, SourceKind};

use crate::error::SourceError;
use crate::fetcher::ContentFetcher;
use crate::scraper::PageScraper;
use crate::sources::SourceAdapter;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn candidate(url: &str, title: &str, source: SourceKind) -> Candidate {
    Candidate {
        title: title.to_string(),
        excerpt: format!("{title} excerpt"),
        url: url.to_string(),
        source,
    }
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// URL-keyed fetcher. Unregistered URLs answer 404.
/// Builder pattern: `.on_url()`, `.on_status()`.
pub struct MockFetcher {
    bodies: HashMap<String, String>,
    statuses: HashMap<String, u16>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            bodies: HashMap::new(),
            statuses: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn on_url(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }

    /// Answer `url` with a non-success status.
    pub fn on_status(mut self, url: &str, status: u16) -> Self {
        self.statuses.insert(url.to_string(), status);
        self
    }

    /// Every URL requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn get(&self, url: &str) -> Result<String, SourceError> {
        self.requests.lock().unwrap().push(url.to_string());

        if let Some(status) = self.statuses.get(url) {
            return Err(SourceError::Status {
                status: *status,
                url: url.to_string(),
            });
        }
        self.bodies.get(url).cloned().ok_or_else(|| SourceError::Status {
            status: 404,
            url: url.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// MockPageScraper
// ---------------------------------------------------------------------------

/// URL-keyed page-to-text. Unregistered URLs fail.
pub struct MockPageScraper {
    pages: HashMap<String, String>,
}

impl MockPageScraper {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
        }
    }

    pub fn on_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }
}

impl Default for MockPageScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageScraper for MockPageScraper {
    async fn scrape(&self, url: &str) -> Result<String> {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("MockPageScraper: no page registered for {url}"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// Adapters
// ---------------------------------------------------------------------------

/// Returns a fixed candidate list, truncated to the requested budget.
/// Records every budget it was asked for.
pub struct MockAdapter {
    name: String,
    kind: SourceKind,
    candidates: Vec<Candidate>,
    budgets: Mutex<Vec<usize>>,
}

impl MockAdapter {
    pub fn new(name: &str, kind: SourceKind, candidates: Vec<Candidate>) -> Self {
        Self {
            name: name.to_string(),
            kind,
            candidates,
            budgets: Mutex::new(Vec::new()),
        }
    }

    /// Budgets passed to `fetch`, one per call.
    pub fn budgets(&self) -> Vec<usize> {
        self.budgets.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.budgets.lock().unwrap().len()
    }
}

#[async_trait]
impl SourceAdapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        self.kind.clone()
    }

    async fn fetch(&self, _query: &Query, max_results: usize) -> Result<Vec<Candidate>, SourceError> {
        self.budgets.lock().unwrap().push(max_results);
        Ok(self.candidates.iter().take(max_results).cloned().collect())
    }
}

/// Always fails, like a source that is down.
pub struct FailingAdapter {
    name: String,
}

impl FailingAdapter {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

#[async_trait]
impl SourceAdapter for FailingAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Web
    }

    async fn fetch(&self, _query: &Query, _max_results: usize) -> Result<Vec<Candidate>, SourceError> {
        Err(SourceError::Network(format!("{} is unreachable", self.name)))
    }
}

/// Never completes, like a source that hangs without a timeout.
pub struct HangingAdapter;

#[async_trait]
impl SourceAdapter for HangingAdapter {
    fn name(&self) -> &str {
        "hanging"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Web
    }

    async fn fetch(&self, _query: &Query, _max_results: usize) -> Result<Vec<Candidate>, SourceError> {
        std::future::pending::<()>().await;
        Ok(Vec::new())
    }
}
