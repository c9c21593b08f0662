//! HTTP implementation of the thumbnail fetcher.

use async_trait::async_trait;
use std::time::Duration;

use super::models::{FetchError, ThumbnailFetcher};
use crate::youtube::{thumbnail_url, ThumbnailQuality, VideoId};

/// oEmbed-style endpoint used for best-effort title lookups.
const OEMBED_ENDPOINT: &str = "https://noembed.com/embed";

/// Fetcher backed by the public thumbnail CDN and the oEmbed title endpoint.
pub struct CdnFetcher {
    client: reqwest::Client,
}

impl CdnFetcher {
    /// Create a new fetcher.
    ///
    /// # Arguments
    /// * `timeout_sec` - Per-request timeout in seconds
    pub fn new(timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }
}

#[async_trait]
impl ThumbnailFetcher for CdnFetcher {
    async fn fetch_image(
        &self,
        video_id: &VideoId,
        quality: ThumbnailQuality,
    ) -> Result<Vec<u8>, FetchError> {
        let url = thumbnail_url(video_id, quality);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn lookup_title(&self, video_id: &VideoId) -> Result<String, FetchError> {
        let url = format!(
            "{}?url={}",
            OEMBED_ENDPOINT,
            urlencoding::encode(&video_id.watch_url())
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url,
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        body.get("title")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or(FetchError::EmptyBody(url))
    }
}
