// Aggregator: fans a query out to every source adapter in priority order.
//
// Dedup is first-seen-wins by URL across adapters. In concurrent mode results
// are merged in priority order, never arrival order, so both modes resolve
// duplicates identically. Adapter errors and timeouts become empty batches
// here and nowhere else.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use gripewatch_common::{Candidate, FanOut, Query};

use crate::sources::SourceAdapter;

const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Aggregator {
    adapters: Vec<Arc<dyn SourceAdapter>>,
    adapter_timeout: Duration,
    fan_out: FanOut,
}

impl Aggregator {
    /// `adapters` must already be in priority order, highest first.
    pub fn new(adapters: Vec<Arc<dyn SourceAdapter>>) -> Self {
        Self {
            adapters,
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
            fan_out: FanOut::Sequential,
        }
    }

    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    pub fn with_fan_out(mut self, fan_out: FanOut) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn adapter_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Collect at most `max_total` deduplicated candidates for `raw_query`.
    ///
    /// Empty after normalization → empty result. Nothing found anywhere →
    /// a single `System` sentinel with an empty URL.
    pub async fn search_complaints(&self, raw_query: &str, max_total: usize) -> Vec<Candidate> {
        let Some(query) = Query::parse(raw_query) else {
            debug!("Empty query, skipping search");
            return Vec::new();
        };
        if max_total == 0 {
            return Vec::new();
        }

        info!(query = query.as_str(), max_total, fan_out = ?self.fan_out, "Searching complaints");

        let mut merged = MergeBuffer::new(max_total);
        match self.fan_out {
            FanOut::Sequential => {
                for adapter in &self.adapters {
                    if merged.is_full() {
                        break;
                    }
                    let batch = self.run_adapter(adapter.as_ref(), &query, merged.remaining()).await;
                    merged.extend(adapter.name(), batch);
                }
            }
            FanOut::Concurrent => {
                // `buffered` yields in input order, so batches line up with
                // the adapters they came from.
                let batches: Vec<Vec<Candidate>> = stream::iter(
                    self.adapters
                        .iter()
                        .map(|adapter| self.run_adapter(adapter.as_ref(), &query, max_total)),
                )
                .buffered(self.adapters.len().max(1))
                .collect()
                .await;
                for (adapter, batch) in self.adapters.iter().zip(batches) {
                    if merged.is_full() {
                        break;
                    }
                    merged.extend(adapter.name(), batch);
                }
            }
        }

        let mut results = merged.into_items();
        if results.is_empty() {
            info!(query = query.as_str(), "No complaints found, returning sentinel");
            results.push(Candidate::no_results(&query));
        }

        info!(query = query.as_str(), count = results.len(), "Search complete");
        results
    }

    /// One adapter call under the per-adapter timeout. Failures and timeouts
    /// yield an empty batch.
    async fn run_adapter(&self, adapter: &dyn SourceAdapter, query: &Query, budget: usize) -> Vec<Candidate> {
        let source = adapter.name();
        match tokio::time::timeout(self.adapter_timeout, adapter.fetch(query, budget)).await {
            Ok(Ok(mut batch)) => {
                batch.truncate(budget);
                info!(source, count = batch.len(), "Source returned candidates");
                batch
            }
            Ok(Err(e)) => {
                warn!(source, error = %e, "Source failed, treating as empty");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    source,
                    timeout_secs = self.adapter_timeout.as_secs_f64(),
                    "Source timed out, treating as empty"
                );
                Vec::new()
            }
        }
    }
}

/// The working result list plus the seen-URL set for one query.
struct MergeBuffer {
    max_total: usize,
    seen: HashSet<String>,
    items: Vec<Candidate>,
}

impl MergeBuffer {
    fn new(max_total: usize) -> Self {
        Self {
            max_total,
            seen: HashSet::new(),
            items: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.max_total
    }

    fn remaining(&self) -> usize {
        self.max_total.saturating_sub(self.items.len())
    }

    fn extend(&mut self, source: &str, batch: Vec<Candidate>) {
        let mut duplicates = 0usize;
        for candidate in batch {
            if self.is_full() {
                break;
            }
            // Empty URLs are reserved for the sentinel.
            if candidate.is_sentinel() {
                continue;
            }
            if self.seen.insert(candidate.url.clone()) {
                self.items.push(candidate);
            } else {
                duplicates += 1;
            }
        }
        if duplicates > 0 {
            debug!(source, duplicates, "Dropped cross-source duplicates");
        }
    }

    fn into_items(self) -> Vec<Candidate> {
        self.items
    }
}
