use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tracing::{info, warn};

use crate::fetcher::ContentFetcher;

// --- PageScraper trait ---

/// Page-to-text: given any URL, return its cleaned visible text.
#[async_trait]
pub trait PageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<String>;

    fn name(&self) -> &str;

    /// Like [`scrape`](PageScraper::scrape) but failures and empty pages
    /// become `None`.
    async fn scrape_text(&self, url: &str) -> Option<String> {
        match self.scrape(url).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                warn!(url, scraper = self.name(), "Empty page text");
                None
            }
            Err(e) => {
                warn!(url, scraper = self.name(), error = %e, "Page scrape failed");
                None
            }
        }
    }
}

// --- Readability scraper ---

static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").expect("valid regex"));
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Fetches a page through a [`ContentFetcher`] and extracts its main
/// content with Readability.
pub struct ReadabilityScraper {
    fetcher: Arc<dyn ContentFetcher>,
    transform: TransformConfig,
}

impl ReadabilityScraper {
    pub fn new(fetcher: Arc<dyn ContentFetcher>) -> Self {
        Self {
            fetcher,
            transform: TransformConfig {
                readability: true,
                main_content: true,
                return_format: ReturnFormat::Markdown,
                filter_images: true,
                filter_svg: true,
                clean_html: true,
            },
        }
    }

    fn extract(&self, html: &str, url: &url::Url) -> String {
        let input = TransformInput {
            url: Some(url),
            content: html.as_bytes(),
            screenshot_bytes: None,
            encoding: None,
            selector_config: None,
            ignore_tags: None,
        };
        tidy_markdown(&transform_content_input(input, &self.transform))
    }
}

/// Keep link and image labels, drop their targets, and squeeze blank runs so
/// each paragraph sits on its own line for snippet selection.
fn tidy_markdown(markdown: &str) -> String {
    let unlinked = MD_LINK_RE.replace_all(markdown, "$1");
    BLANK_RUN_RE.replace_all(unlinked.trim(), "\n\n").into_owned()
}

#[async_trait]
impl PageScraper for ReadabilityScraper {
    async fn scrape(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
        }

        let html = self
            .fetcher
            .get(url)
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if html.trim().is_empty() {
            return Ok(String::new());
        }

        let text = self.extract(&html, &parsed);
        info!(url, scraper = "readability", chars = text.len(), "Scraped page");
        Ok(text)
    }

    fn name(&self) -> &str {
        "readability"
    }
}

// --- Link extraction ---

static HREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*=\s*["']([^"']+)["']"#).expect("valid regex"));

/// Extract links from raw HTML whose resolved URL contains `pattern`.
/// Relative URLs resolve against `base_url`; results are deduplicated and
/// capped at `cap`.
pub fn extract_links_by_pattern(html: &str, base_url: &str, pattern: &str, cap: usize) -> Vec<String> {
    let base = url::Url::parse(base_url).ok();

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for cap_match in HREF_RE.captures_iter(html) {
        if links.len() >= cap {
            break;
        }
        let raw = cap_match[1].replace("&amp;", "&");

        let resolved = if raw.starts_with("http://") || raw.starts_with("https://") {
            raw
        } else if let Some(ref b) = base {
            match b.join(&raw) {
                Ok(u) => u.to_string(),
                Err(_) => continue,
            }
        } else {
            continue;
        };

        if resolved.contains(pattern) && seen.insert(resolved.clone()) {
            links.push(resolved);
        }
    }

    links
}
