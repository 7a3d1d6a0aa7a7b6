use std::sync::Arc;

use tracing::info;

use gripewatch_common::{ComplaintResult, ScoutConfig};

use crate::aggregator::Aggregator;
use crate::classifier::Classifier;
use crate::error::SourceError;
use crate::fetcher::{ContentFetcher, HttpFetcher};
use crate::scraper::{PageScraper, ReadabilityScraper};
use crate::sources::build_adapters;

/// Aggregate then classify: the inbound entry point of the pipeline.
pub struct ComplaintSearch {
    aggregator: Aggregator,
    classifier: Classifier<'static>,
}

impl ComplaintSearch {
    pub fn new(aggregator: Aggregator) -> Self {
        Self {
            aggregator,
            classifier: Classifier::standard(),
        }
    }

    /// Wire the HTTP fetcher, Readability page-to-text and every enabled
    /// source adapter from `config`.
    pub fn from_config(config: &ScoutConfig) -> Result<Self, SourceError> {
        let fetcher: Arc<dyn ContentFetcher> =
            Arc::new(HttpFetcher::new(&config.user_agent, config.request_timeout)?);
        let scraper: Arc<dyn PageScraper> = Arc::new(ReadabilityScraper::new(fetcher.clone()));
        Ok(Self::with_backends(config, fetcher, scraper))
    }

    /// Same wiring as [`from_config`](Self::from_config) over caller-supplied
    /// fetch backends.
    pub fn with_backends(
        config: &ScoutConfig,
        fetcher: Arc<dyn ContentFetcher>,
        scraper: Arc<dyn PageScraper>,
    ) -> Self {
        let aggregator = Aggregator::new(build_adapters(config, fetcher, scraper))
            .with_adapter_timeout(config.adapter_timeout)
            .with_fan_out(config.fan_out);
        info!(sources = ?aggregator.adapter_names(), "Complaint search ready");
        Self::new(aggregator)
    }

    /// Search every source for `query` and classify what comes back, in
    /// aggregation order.
    pub async fn search(&self, query: &str, max_total: usize) -> Vec<ComplaintResult> {
        self.aggregator
            .search_complaints(query, max_total)
            .await
            .into_iter()
            .map(|candidate| self.classifier.classify_candidate(candidate))
            .collect()
    }
}

/// Stable sort by category name for grouped display. Order within a
/// category is preserved.
pub fn sort_for_display(results: &mut [ComplaintResult]) {
    results.sort_by(|a, b| a.category.cmp(&b.category));
}
