//! Batch resolution and quality-fallback downloads.

use futures::future::join_all;
use std::sync::Arc;
use tracing::debug;

use super::models::{BatchResolveReport, FetchError, FetchedImage, ThumbnailFetcher};
use crate::youtube::{all_qualities, extract_video_id, ThumbnailQuality, ThumbnailSet, VideoId};

/// In-flight fetches per batch during bulk packaging. Batches run strictly in
/// sequence, so this is the hard bound on simultaneous CDN connections.
pub const DOWNLOAD_BATCH_SIZE: usize = 5;

/// Reduced fallback chain used for bulk downloads. The preview ladder shows
/// all five tiers; packaging only ever wants the best image that exists.
pub const DOWNLOAD_FALLBACK_CHAIN: [ThumbnailQuality; 3] = [
    ThumbnailQuality::Maxres,
    ThumbnailQuality::Hq,
    ThumbnailQuality::Mq,
];

/// Title used when the lookup fails or returns nothing.
pub const PLACEHOLDER_TITLE: &str = "Unknown Video";

/// Coordinates metadata resolution and image downloads over the fetcher seam.
pub struct BatchOrchestrator {
    fetcher: Arc<dyn ThumbnailFetcher>,
}

impl BatchOrchestrator {
    pub fn new(fetcher: Arc<dyn ThumbnailFetcher>) -> Self {
        Self { fetcher }
    }

    /// Resolve a pasted batch of URLs into thumbnail ladders.
    ///
    /// Inputs that yield no video ID are dropped and counted. Title lookups
    /// run concurrently (the batch comes from manual pasting, so its size is
    /// naturally small) and degrade to [`PLACEHOLDER_TITLE`] on any failure.
    /// Output order follows input order.
    pub async fn resolve_metadata(&self, urls: &[String]) -> BatchResolveReport {
        let ids: Vec<VideoId> = urls
            .iter()
            .filter_map(|url| extract_video_id(url))
            .collect();
        let invalid_count = urls.len() - ids.len();

        let lookups = ids.iter().map(|id| async move {
            let title = match self.fetcher.lookup_title(id).await {
                Ok(title) => title,
                Err(err) => {
                    debug!("Title lookup failed for {}: {}", id, err);
                    PLACEHOLDER_TITLE.to_string()
                }
            };
            let thumbnails = all_qualities(id);
            ThumbnailSet {
                video_id: id.clone(),
                video_title: title,
                total: thumbnails.len(),
                thumbnails,
            }
        });

        BatchResolveReport {
            results: join_all(lookups).await,
            invalid_count,
        }
    }

    /// Fetch a single tier directly, treating an empty body as absence.
    pub async fn fetch_single(
        &self,
        video_id: &VideoId,
        quality: ThumbnailQuality,
    ) -> Result<FetchedImage, FetchError> {
        let bytes = self.fetcher.fetch_image(video_id, quality).await?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody(format!("{}/{}", video_id, quality.file_stem())));
        }
        Ok(FetchedImage {
            video_id: video_id.clone(),
            quality,
            bytes,
        })
    }

    /// Download the best available image, walking the reduced fallback chain.
    ///
    /// Each tier attempt is independent: a transport failure, bad status or
    /// empty body moves on to the next tier. Only when every tier in the
    /// chain has failed does the row itself fail.
    pub async fn fetch_image_with_fallback(
        &self,
        video_id: &VideoId,
    ) -> Result<FetchedImage, FetchError> {
        for quality in DOWNLOAD_FALLBACK_CHAIN {
            match self.fetcher.fetch_image(video_id, quality).await {
                Ok(bytes) if !bytes.is_empty() => {
                    return Ok(FetchedImage {
                        video_id: video_id.clone(),
                        quality,
                        bytes,
                    });
                }
                Ok(_) => {
                    debug!("Empty body for {} at {}", video_id, quality.file_stem());
                }
                Err(err) => {
                    debug!("Fetch failed for {} at {}: {}", video_id, quality.file_stem(), err);
                }
            }
        }
        Err(FetchError::Exhausted(video_id.clone()))
    }
}
