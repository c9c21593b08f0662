use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::youtube::{ThumbnailQuality, ThumbnailSet, VideoId};

/// Errors for a single image or title fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Empty response body from {0}")]
    EmptyBody(String),

    #[error("No thumbnail available for {0} at any attempted quality")]
    Exhausted(VideoId),
}

/// Network seam for thumbnail images and video titles.
///
/// The production implementation talks to the thumbnail CDN and an
/// oEmbed-style title endpoint; tests substitute a stub.
#[async_trait]
pub trait ThumbnailFetcher: Send + Sync {
    /// Fetch the raw image bytes for a video at one quality tier.
    ///
    /// A transport-level success with an empty body is returned as-is; the
    /// caller treats non-zero length as its only availability signal (the
    /// CDN serves placeholders that are indistinguishable by status code).
    async fn fetch_image(
        &self,
        video_id: &VideoId,
        quality: ThumbnailQuality,
    ) -> Result<Vec<u8>, FetchError>;

    /// Look up a human-readable title for a video. Best effort.
    async fn lookup_title(&self, video_id: &VideoId) -> Result<String, FetchError>;
}

/// A successfully downloaded image and the quality tier that produced it.
#[derive(Clone, Debug)]
pub struct FetchedImage {
    pub video_id: VideoId,
    pub quality: ThumbnailQuality,
    pub bytes: Vec<u8>,
}

/// Outcome of resolving a pasted batch of URLs to thumbnail ladders.
///
/// `results` holds one entry per input URL that yielded a video ID, in input
/// order; inputs that failed extraction are only reflected in
/// `invalid_count`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResolveReport {
    pub results: Vec<ThumbnailSet>,
    pub invalid_count: usize,
}
