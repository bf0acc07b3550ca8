// src/crtsh/client.rs
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::CrtShConfig;
use crate::progress::ProgressIndicator;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// HTTP client for the crt.sh search endpoint
pub struct CrtShClient {
    base_url: String,
    max_retries: u32,
    initial_backoff: Duration,
    http_client: reqwest::Client,
}

/// Outcome of a single request attempt
enum Attempt {
    Done(Vec<u8>),
    Retry(anyhow::Error),
    Fatal(anyhow::Error),
}

impl CrtShClient {
    /// Create a new crt.sh client
    pub fn new(config: &CrtShConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
            initial_backoff: Duration::from_secs(1),
            http_client,
        })
    }

    /// Override the first retry delay (doubles on every further retry)
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Search URL for a domain pattern.
    /// Endpoint: GET {base_url}/?q={pattern}&output=json
    ///
    /// `%` is the crt.sh wildcard and is sent as `%25`; the rest of the
    /// pattern is passed through as given.
    pub fn query_url(&self, pattern: &str) -> Result<Url> {
        let encoded = pattern.replace('%', "%25");
        let raw = format!("{}/?q={}&output=json", self.base_url, encoded);

        Url::parse(&raw).with_context(|| format!("Invalid query URL: {}", raw))
    }

    /// Fetch the raw search response body for a domain pattern, retrying
    /// connection failures, timeouts, 5xx and 429 with exponential backoff
    pub async fn fetch(&self, pattern: &str) -> Result<Vec<u8>> {
        self.fetch_with_progress(pattern, &ProgressIndicator::disabled()).await
    }

    /// Same as [`fetch`](Self::fetch); retry warnings are printed with the
    /// spinner suspended so they don't collide with it
    pub async fn fetch_with_progress(
        &self,
        pattern: &str,
        progress: &ProgressIndicator,
    ) -> Result<Vec<u8>> {
        let url = self.query_url(pattern)?;
        let mut retries = 0;
        let mut backoff = self.initial_backoff;

        loop {
            let err = match self.attempt(&url).await {
                Attempt::Done(body) => return Ok(body),
                Attempt::Fatal(e) => return Err(e),
                Attempt::Retry(e) => e,
            };

            if retries >= self.max_retries {
                return Err(err.context(format!(
                    "Failed after {} retries",
                    self.max_retries
                )));
            }
            retries += 1;

            progress.suspend(|| {
                warn!(
                    "Error querying crt.sh (retry {}/{}): {}. Retrying in {:?}",
                    retries, self.max_retries, err, backoff
                )
            });
            progress.set_message(format!(
                "Retrying crt.sh ({}/{})",
                retries, self.max_retries
            ));

            tokio::time::sleep(backoff).await;
            backoff = std::cmp::min(backoff * 2, MAX_BACKOFF);
        }
    }

    async fn attempt(&self, url: &Url) -> Attempt {
        debug!("GET {}", url);

        let response = match self.http_client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(anyhow::Error::new(e).context("Error getting response")),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = anyhow::anyhow!(
                "crt.sh request failed with status {}: {}",
                status,
                body.trim()
            );

            return if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                Attempt::Retry(err)
            } else {
                Attempt::Fatal(err)
            };
        }

        match response.bytes().await {
            Ok(bytes) => {
                debug!("Received {} bytes from crt.sh", bytes.len());
                Attempt::Done(bytes.to_vec())
            }
            Err(e) => Attempt::Retry(anyhow::Error::new(e).context("Error reading response body")),
        }
    }
}
