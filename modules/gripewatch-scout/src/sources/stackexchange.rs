// Stack Exchange advanced search (Q&A aggregator).
//
// The API answers errors with a JSON body carrying `error_id`; that is
// treated as a failed lookup even when the status code is 200.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use gripewatch_common::{excerpt, is_complaint_like, strip_markup, Candidate, Query, SourceKind, MAX_EXCERPT_CHARS};

use super::{Collector, SourceAdapter};
use crate::error::SourceError;
use crate::fetcher::{get_json, ContentFetcher};

const SEARCH_ENDPOINT: &str = "https://api.stackexchange.com/2.3/search/advanced";

const TERM_SUFFIXES: &[&str] = &["problem", "issue"];

/// The API's hard ceiling on `pagesize`.
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<Question>,
    error_id: Option<u32>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Question {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    link: String,
}

pub struct StackExchangeAdapter {
    fetcher: Arc<dyn ContentFetcher>,
    site: String,
}

impl StackExchangeAdapter {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, site: &str) -> Self {
        Self {
            fetcher,
            site: site.to_string(),
        }
    }

    pub fn search_url(&self, term: &str, page_size: usize) -> Result<String, SourceError> {
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE).to_string();
        let url = url::Url::parse_with_params(
            SEARCH_ENDPOINT,
            &[
                ("order", "desc"),
                ("sort", "relevance"),
                ("q", term),
                ("site", self.site.as_str()),
                ("pagesize", page_size.as_str()),
                ("filter", "withbody"),
            ],
        )?;
        Ok(url.to_string())
    }

    async fn search_term(&self, term: &str, collector: &mut Collector<'_>) -> Result<(), SourceError> {
        let url = self.search_url(term, collector.remaining())?;
        let response: SearchResponse = get_json(self.fetcher.as_ref(), &url).await?;

        if let Some(id) = response.error_id {
            let message = response.error_message.unwrap_or_default();
            return Err(SourceError::Api(format!("stackexchange error {id}: {message}")));
        }

        let total = response.items.len();
        let mut kept = 0usize;
        for question in response.items {
            if collector.is_full() {
                break;
            }
            if let Some(candidate) = to_candidate(question) {
                if collector.push(candidate) {
                    kept += 1;
                }
            }
        }

        info!(term, site = self.site.as_str(), total, kept, "stackexchange: term searched");
        Ok(())
    }
}

fn to_candidate(question: Question) -> Option<Candidate> {
    if question.link.is_empty() {
        return None;
    }
    let title = strip_markup(&question.title);
    let body = strip_markup(&question.body);
    if !is_complaint_like(&format!("{title} {body}")) {
        return None;
    }
    Some(Candidate {
        title,
        excerpt: excerpt(&body, MAX_EXCERPT_CHARS),
        url: question.link,
        source: SourceKind::QaAggregator,
    })
}

#[async_trait]
impl SourceAdapter for StackExchangeAdapter {
    fn name(&self) -> &str {
        "stackexchange"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::QaAggregator
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
