//! Aggregator behavior over mock adapters: caps, budgets, dedup priority,
//! failure isolation and the no-results sentinel.

use std::sync::Arc;
use std::time::Duration;

use gripewatch_common::{FanOut, SourceKind};
use gripewatch_scout::aggregator::Aggregator;
use gripewatch_scout::sources::SourceAdapter;
use gripewatch_scout::testing::{candidate, FailingAdapter, HangingAdapter, MockAdapter};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn forum(urls: &[&str]) -> Arc<MockAdapter> {
    Arc::new(MockAdapter::new(
        "forum",
        SourceKind::Forum,
        urls.iter().map(|u| candidate(u, &format!("forum {u}"), SourceKind::Forum)).collect(),
    ))
}

fn web(urls: &[&str]) -> Arc<MockAdapter> {
    Arc::new(MockAdapter::new(
        "web",
        SourceKind::Web,
        urls.iter().map(|u| candidate(u, &format!("web {u}"), SourceKind::Web)).collect(),
    ))
}

fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("https://{prefix}/{i}")).collect()
}

fn urls(results: &[gripewatch_common::Candidate]) -> Vec<&str> {
    results.iter().map(|c| c.url.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Cap and budget
// ---------------------------------------------------------------------------

#[tokio::test]
async fn never_exceeds_max_total() {
    let a = numbered("a", 10);
    let b = numbered("b", 10);
    let first = forum(&a.iter().map(String::as_str).collect::<Vec<_>>());
    let second = web(&b.iter().map(String::as_str).collect::<Vec<_>>());
    let aggregator = Aggregator::new(vec![first.clone(), second.clone()]);

    for max in [1, 5, 10, 15, 25] {
        let results = aggregator.search_complaints("Acme", max).await;
        assert!(results.len() <= max, "{} results for cap {max}", results.len());
    }

    let results = aggregator.search_complaints("Acme", 5).await;
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|c| c.source == SourceKind::Forum));
}

#[tokio::test]
async fn later_adapters_get_the_remaining_budget() {
    let first = forum(&["https://x/1", "https://x/2", "https://x/3"]);
    let second = web(&["https://y/1"]);
    let aggregator = Aggregator::new(vec![first.clone(), second.clone()]);

    let results = aggregator.search_complaints("Acme", 10).await;

    assert_eq!(results.len(), 4);
    assert_eq!(first.budgets(), vec![10]);
    assert_eq!(second.budgets(), vec![7]);
}

#[tokio::test]
async fn stops_querying_once_full() {
    let first = forum(&["https://x/1", "https://x/2"]);
    let second = web(&["https://y/1"]);
    let aggregator = Aggregator::new(vec![first.clone(), second.clone()]);

    let results = aggregator.search_complaints("Acme", 2).await;

    assert_eq!(urls(&results), vec!["https://x/1", "https://x/2"]);
    assert_eq!(second.calls(), 0);
}

#[tokio::test]
async fn zero_cap_returns_nothing() {
    let first = forum(&["https://x/1"]);
    let aggregator = Aggregator::new(vec![first.clone()]);

    assert!(aggregator.search_complaints("Acme", 0).await.is_empty());
    assert_eq!(first.calls(), 0);
}

// ---------------------------------------------------------------------------
// Dedup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn duplicate_url_kept_from_higher_priority_adapter() {
    let aggregator = Aggregator::new(vec![forum(&["https://x/1"]), web(&["https://x/1"])]);

    let results = aggregator.search_complaints("Acme", 10).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].url, "https://x/1");
    assert_eq!(results[0].source, SourceKind::Forum);
}

#[tokio::test]
async fn urls_are_pairwise_distinct() {
    let aggregator = Aggregator::new(vec![
        forum(&["https://x/1", "https://x/2"]),
        web(&["https://x/2", "https://x/3", "https://x/1"]),
    ]);

    let results = aggregator.search_complaints("Acme", 10).await;

    assert_eq!(urls(&results), vec!["https://x/1", "https://x/2", "https://x/3"]);
}

#[tokio::test]
async fn empty_urls_from_adapters_are_dropped() {
    let aggregator = Aggregator::new(vec![forum(&["", "https://x/1"])]);

    let results = aggregator.search_complaints("Acme", 10).await;

    assert_eq!(urls(&results), vec!["https://x/1"]);
}

// ---------------------------------------------------------------------------
// Empty query and sentinel
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_query_returns_empty_without_searching() {
    let first = forum(&["https://x/1"]);
    let aggregator = Aggregator::new(vec![first.clone()]);

    assert!(aggregator.search_complaints("", 10).await.is_empty());
    assert!(aggregator.search_complaints("   \t\n", 10).await.is_empty());
    assert_eq!(first.calls(), 0);
}

#[tokio::test]
async fn all_adapters_failing_yields_one_sentinel() {
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(FailingAdapter::new("reddit")),
        Arc::new(FailingAdapter::new("stackexchange")),
        Arc::new(FailingAdapter::new("web")),
    ];
    let aggregator = Aggregator::new(adapters);

    let results = aggregator.search_complaints("  Acme   Corp ", 10).await;

    assert_eq!(results.len(), 1);
    let sentinel = &results[0];
    assert!(sentinel.is_sentinel());
    assert_eq!(sentinel.url, "");
    assert_eq!(sentinel.source, SourceKind::System);
    assert!(sentinel.excerpt.contains("Acme Corp"));
}

#[tokio::test]
async fn no_adapters_yields_sentinel() {
    let aggregator = Aggregator::new(Vec::new());

    let results = aggregator.search_complaints("Acme", 10).await;

    assert_eq!(results.len(), 1);
    assert!(results[0].is_sentinel());
}

#[tokio::test]
async fn failing_adapter_does_not_affect_others() {
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(FailingAdapter::new("reddit")),
        web(&["https://y/1"]),
    ];
    let aggregator = Aggregator::new(adapters);

    let results = aggregator.search_complaints("Acme", 10).await;

    assert_eq!(urls(&results), vec!["https://y/1"]);
}

// ---------------------------------------------------------------------------
// Timeouts and fan-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hanging_adapter_is_cut_off() {
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        forum(&["https://x/1"]),
        Arc::new(HangingAdapter),
        web(&["https://y/1"]),
    ];
    let aggregator = Aggregator::new(adapters).with_adapter_timeout(Duration::from_millis(50));

    let results = aggregator.search_complaints("Acme", 10).await;

    assert_eq!(urls(&results), vec!["https://x/1", "https://y/1"]);
}

#[tokio::test]
async fn hanging_adapter_is_cut_off_concurrently() {
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(HangingAdapter), web(&["https://y/1"])];
    let aggregator = Aggregator::new(adapters)
        .with_adapter_timeout(Duration::from_millis(50))
        .with_fan_out(FanOut::Concurrent);

    let results = aggregator.search_complaints("Acme", 10).await;

    assert_eq!(urls(&results), vec!["https://y/1"]);
}

#[tokio::test]
async fn concurrent_resolves_duplicates_like_sequential() {
    let build = |fan_out: FanOut| {
        Aggregator::new(vec![
            forum(&["https://x/1", "https://x/2"]),
            web(&["https://x/2", "https://y/1", "https://y/2"]),
        ])
        .with_fan_out(fan_out)
    };

    let sequential = build(FanOut::Sequential).search_complaints("Acme", 10).await;
    let concurrent = build(FanOut::Concurrent).search_complaints("Acme", 10).await;

    assert_eq!(sequential, concurrent);
    assert_eq!(concurrent[1].url, "https://x/2");
    assert_eq!(concurrent[1].source, SourceKind::Forum);
}

#[tokio::test]
async fn concurrent_gives_every_adapter_the_full_budget() {
    let first = forum(&["https://x/1", "https://x/2"]);
    let second = web(&["https://y/1"]);
    let aggregator =
        Aggregator::new(vec![first.clone(), second.clone()]).with_fan_out(FanOut::Concurrent);

    aggregator.search_complaints("Acme", 5).await;

    assert_eq!(first.budgets(), vec![5]);
    assert_eq!(second.budgets(), vec![5]);
}
