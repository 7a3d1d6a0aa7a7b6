use thiserror::Error;

/// Why one lookup against an external source produced nothing.
///
/// Always recoverable: adapters swallow it per term and the aggregator
/// swallows it per adapter.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout(err.to_string())
        } else if err.is_decode() {
            SourceError::Malformed(err.to_string())
        } else {
            SourceError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Malformed(err.to_string())
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::InvalidUrl(err.to_string())
    }
}
