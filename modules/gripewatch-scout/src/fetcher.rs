// ContentFetcher: every outbound GET goes through this one trait.
//
// Adapters only see `Arc<dyn ContentFetcher>`, so tests swap in MockFetcher:
// no network, deterministic payloads, injectable failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::SourceError;

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// GET `url` and return the response body as text.
    /// Non-success status is an error.
    async fn get(&self, url: &str) -> Result<String, SourceError>;
}

/// GET `url` and decode the body as JSON.
pub async fn get_json<T: DeserializeOwned>(
    fetcher: &dyn ContentFetcher,
    url: &str,
) -> Result<T, SourceError> {
    let body = fetcher.get(url).await?;
    Ok(serde_json::from_str(&body)?)
}

// ---------------------------------------------------------------------------
// HttpFetcher: reqwest with a fixed timeout and identifying User-Agent
// ---------------------------------------------------------------------------

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, SourceError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/html;q=0.9, */*;q=0.5"),
        );

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String, SourceError> {
        debug!(url, "GET");

        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(resp.text().await?)
    }
}
