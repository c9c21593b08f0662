//! Test doubles for the network seams.

use async_trait::async_trait;
use std::collections::HashSet;

use thumbgrab_server::fetcher::{FetchError, ThumbnailFetcher};
use thumbgrab_server::youtube::{ThumbnailQuality, VideoId};

use super::constants::{VIDEO_MISSING, VIDEO_NO_MAXRES};

/// Fake JPEG payload served by the stub fetcher.
pub const FAKE_JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

/// Scripted replacement for the CDN and the title endpoint.
///
/// Serves [`FAKE_JPEG`] for every (video, quality) pair except:
/// - [`VIDEO_NO_MAXRES`]: 404 at maxres, image at lower tiers
/// - [`VIDEO_MISSING`]: 404 at every tier
///
/// Titles resolve to `"Title of {id}"` except for [`VIDEO_MISSING`].
pub struct StubFetcher {
    no_maxres: HashSet<String>,
    missing: HashSet<String>,
}

impl Default for StubFetcher {
    fn default() -> Self {
        Self {
            no_maxres: [VIDEO_NO_MAXRES.to_string()].into(),
            missing: [VIDEO_MISSING.to_string()].into(),
        }
    }
}

#[async_trait]
impl ThumbnailFetcher for StubFetcher {
    async fn fetch_image(
        &self,
        video_id: &VideoId,
        quality: ThumbnailQuality,
    ) -> Result<Vec<u8>, FetchError> {
        let id = video_id.as_str();
        let unavailable = self.missing.contains(id)
            || (self.no_maxres.contains(id) && quality == ThumbnailQuality::Maxres);
        if unavailable {
            return Err(FetchError::Status {
                status: 404,
                url: format!("stub://{}/{}", id, quality.tag()),
            });
        }
        Ok(FAKE_JPEG.to_vec())
    }

    async fn lookup_title(&self, video_id: &VideoId) -> Result<String, FetchError> {
        if self.missing.contains(video_id.as_str()) {
            return Err(FetchError::Transport("no such video".to_string()));
        }
        Ok(format!("Title of {}", video_id))
    }
}
