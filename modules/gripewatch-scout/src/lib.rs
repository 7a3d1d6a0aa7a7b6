pub mod aggregator;
pub mod classifier;
pub mod error;
pub mod fetcher;
pub mod scraper;
pub mod search;
pub mod sources;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use aggregator::Aggregator;
pub use classifier::{classify, Classifier};
pub use error::SourceError;
pub use fetcher::{ContentFetcher, HttpFetcher};
pub use scraper::{PageScraper, ReadabilityScraper};
pub use search::{sort_for_display, ComplaintSearch};
pub use sources::{build_adapters, SourceAdapter};
