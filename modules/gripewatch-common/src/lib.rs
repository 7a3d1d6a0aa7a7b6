pub mod config;
pub mod error;
pub mod relevance;
pub mod taxonomy;
pub mod text;
pub mod types;

pub use config::{FanOut, ScoutConfig, SourceId};
pub use error::GripewatchError;
pub use relevance::{complaint_snippet, is_complaint_like, RelevanceFilter};
pub use taxonomy::{CategoryRule, CategoryTaxonomy};
pub use text::{excerpt, normalize, strip_markup};
pub use types::*;
