//! Async HTTP client wrapping reqwest.
//!
//! One GET, whole body as text. No retries: a failed request ends the run.

use crate::error::{CheckError, CheckResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects.
    pub final_url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

/// Anything that can turn a URL into a response body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> CheckResult<String>;
}

/// HTTP client for the API extractor.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with a crate-specific user agent.
    pub fn new(timeout_ms: u64) -> CheckResult<Self> {
        let timeout = Duration::from_millis(timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("crosscheck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Perform a single GET and read the whole body.
    ///
    /// Non-2xx statuses are reported as network errors.
    pub async fn get(&self, url: &str) -> CheckResult<HttpResponse> {
        let r = self.client.get(url).timeout(self.timeout).send().await?;

        let status = r.status();
        let final_url = r.url().to_string();
        if !status.is_success() {
            return Err(CheckError::Network(format!("GET {url} returned {status}")));
        }

        let body = r.text().await?;
        debug!(%url, %final_url, status = status.as_u16(), bytes = body.len(), "fetched");

        Ok(HttpResponse {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &str) -> CheckResult<String> {
        Ok(self.get(url).await?.body)
    }
}
