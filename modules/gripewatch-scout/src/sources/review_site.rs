// Review-site adapter, configured per site.
//
// Two hops: the site's own search page yields review-page links, then each
// review page goes through page-to-text and contributes its first
// complaint-like paragraph.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use gripewatch_common::{complaint_snippet, Candidate, Query, SourceKind, MAX_EXCERPT_CHARS};

use super::{page_title, Collector, SourceAdapter};
use crate::error::SourceError;
use crate::fetcher::ContentFetcher;
use crate::scraper::{extract_links_by_pattern, PageScraper};

/// Max review pages followed from one search page.
const MAX_REVIEW_LINKS: usize = 10;
/// Paragraphs shorter than this are navigation or rating widgets.
const MIN_PARAGRAPH_CHARS: usize = 40;

/// Static description of one review site.
#[derive(Debug, Clone, Copy)]
pub struct ReviewSite {
    pub name: &'static str,
    /// Search page URL with a `{query}` placeholder.
    pub search_url: &'static str,
    /// Substring identifying review-page links on the search page.
    pub link_pattern: &'static str,
}

pub const TRUSTPILOT: ReviewSite = ReviewSite {
    name: "Trustpilot",
    search_url: "https://www.trustpilot.com/search?query={query}",
    link_pattern: "/review/",
};

pub const SITEJABBER: ReviewSite = ReviewSite {
    name: "Sitejabber",
    search_url: "https://www.sitejabber.com/search?q={query}",
    link_pattern: "/reviews/",
};

impl ReviewSite {
    pub fn search_url_for(&self, query: &Query) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(query.as_str().as_bytes()).collect();
        self.search_url.replace("{query}", &encoded)
    }
}

pub struct ReviewSiteAdapter {
    site: ReviewSite,
    fetcher: Arc<dyn ContentFetcher>,
    scraper: Arc<dyn PageScraper>,
    name: String,
}

impl ReviewSiteAdapter {
    pub fn new(site: ReviewSite, fetcher: Arc<dyn ContentFetcher>, scraper: Arc<dyn PageScraper>) -> Self {
        Self {
            site,
            fetcher,
            scraper,
            name: site.name.to_ascii_lowercase(),
        }
    }

    async fn search_site(&self, search_url: &str, collector: &mut Collector<'_>) -> Result<(), SourceError> {
        let html = self.fetcher.get(search_url).await?;
        let links = extract_links_by_pattern(&html, search_url, self.site.link_pattern, MAX_REVIEW_LINKS);

        let mut kept = 0usize;
        for link in &links {
            if collector.is_full() {
                break;
            }
            let Some(text) = self.scraper.scrape_text(link).await else {
                continue;
            };
            let Some(excerpt) = complaint_snippet(&text, MIN_PARAGRAPH_CHARS, MAX_EXCERPT_CHARS) else {
                continue;
            };
            let title = page_title(&text).unwrap_or_else(|| link.clone());
            let pushed = collector.push(Candidate {
                title,
                excerpt,
                url: link.clone(),
                source: self.kind(),
            });
            if pushed {
                kept += 1;
            }
        }

        info!(site = self.site.name, links = links.len(), kept, "review site: searched");
        Ok(())
    }
}

#[async_trait]
impl SourceAdapter for ReviewSiteAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::ReviewSite(self.site.name.to_string())
    }

    async fn fetch(&self, query: &Query, max_results: usize) -> Result<Vec<Candidate>, SourceError> {
        let mut collector = Collector::new(self.name(), max_results);

        // One term: review sites are searched by the bare query.
        let search_url = self.site.search_url_for(query);
        let outcome = self.search_site(&search_url, &mut collector).await;
        collector.finish_term(query.as_str(), outcome);

        collector.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_encodes_query() {
        let q = Query::parse("Acme & Sons").unwrap();
        assert_eq!(
            TRUSTPILOT.search_url_for(&q),
            "https://www.trustpilot.com/search?query=Acme+%26+Sons"
        );
        assert_eq!(
            SITEJABBER.search_url_for(&q),
            "https://www.sitejabber.com/search?q=Acme+%26+Sons"
        );
    }
}
