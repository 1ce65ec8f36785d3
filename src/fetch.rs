//! Network fetch capability
//!
//! Every remote document the builder needs (templates, registry manifests)
//! is retrieved through [`Fetch`], so phases can be exercised against an
//! in-memory implementation. [`HttpFetcher`] is the real one.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{FetchError, Result, fs::io_error};

/// Retrieves the body of a URL as text
#[allow(async_fn_in_trait)]
pub trait Fetch {
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, FetchError>;
}

/// Fetch `url` and decode the body as JSON into `T`
pub async fn fetch_json<F, T>(fetcher: &F, url: &str) -> std::result::Result<T, FetchError>
where
    F: Fetch,
    T: DeserializeOwned,
{
    let body = fetcher.fetch_text(url).await?;
    serde_json::from_str(&body).map_err(|e| FetchError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// [`Fetch`] over HTTP with a bounded per-request timeout
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("drupal-composer-builder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| io_error(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

fn classify(url: &str, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            reason: err.to_string(),
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, FetchError> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify(url, &e))
    }
}
