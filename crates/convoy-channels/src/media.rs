//! Media retrieval from the Graph API, and the retry policy around it.
//!
//! Retrieval is two-step: resolve the media id to a short-lived URL, then
//! fetch the bytes from that URL with the same bearer token.

use async_trait::async_trait;
use convoy_core::{
    config::{MediaConfig, WhatsAppConfig},
    error::MediaError,
    traits::{MediaLocation, MediaSource},
};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Bounded exponential backoff for transient media failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }

    /// Delay after the `attempt`-th failure (1-based): base, 2×base, 4×base, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, MediaError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MediaError>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        "{label}: attempt {attempt}/{} failed ({e}), retrying in {}ms",
                        self.max_attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&MediaConfig::default())
    }
}

/// Map a transport error to a media failure cause.
pub(crate) fn classify_request_error(context: &str, e: reqwest::Error) -> MediaError {
    if e.is_timeout() {
        MediaError::Timeout(format!("{context}: {e}"))
    } else {
        MediaError::Transient(format!("{context}: {e}"))
    }
}

/// Map a non-success HTTP status to a media failure cause.
pub(crate) fn classify_status(context: &str, status: reqwest::StatusCode) -> MediaError {
    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        MediaError::Transient(format!("{context}: HTTP {status}"))
    } else {
        MediaError::Unavailable(format!("{context}: HTTP {status}"))
    }
}

/// Graph API `GET /{media-id}` response.
#[derive(Debug, Deserialize)]
pub(crate) struct MediaInfo {
    pub url: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// Media source backed by the WhatsApp Cloud (Graph) API.
pub struct GraphMediaSource {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GraphMediaSource {
    pub fn new(config: &WhatsAppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.media.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: config.graph_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
        }
    }
}

#[async_trait]
impl MediaSource for GraphMediaSource {
    async fn resolve(&self, media_id: &str) -> Result<MediaLocation, MediaError> {
        let url = format!("{}/{media_id}", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| classify_request_error("media resolve", e))?;

        if !resp.status().is_success() {
            return Err(classify_status("media resolve", resp.status()));
        }

        let info: MediaInfo = resp
            .json()
            .await
            .map_err(|e| MediaError::Unavailable(format!("media resolve parse failed: {e}")))?;

        debug!("resolved media {media_id} ({:?})", info.mime_type);
        Ok(MediaLocation {
            url: info.url,
            mime_type: info.mime_type,
            file_size: info.file_size,
        })
    }

    async fn fetch(&self, location: &MediaLocation) -> Result<Vec<u8>, MediaError> {
        let resp = self
            .client
            .get(&location.url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| classify_request_error("media download", e))?;

        if !resp.status().is_success() {
            return Err(classify_status("media download", resp.status()));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| classify_request_error("media read", e))?;
        Ok(bytes.to_vec())
    }
}
