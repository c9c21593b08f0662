//! The fixed thumbnail quality ladder and CDN URL templates.
//!
//! URLs are derived, never stored: a video ID plus a quality tag fully
//! determines the image URL. Whether the CDN actually has an image at a given
//! tier is only discovered by fetching it.

use serde::{Deserialize, Serialize};

use super::VideoId;

const CDN_BASE: &str = "https://i.ytimg.com/vi";

/// Thumbnail quality tiers, highest first. The declaration order is the
/// ladder order used for fallback preference and UI sorting.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailQuality {
    Maxres,
    Sd,
    Hq,
    Mq,
    Default,
}

/// The full ladder, in quality order.
pub const QUALITY_LADDER: [ThumbnailQuality; 5] = [
    ThumbnailQuality::Maxres,
    ThumbnailQuality::Sd,
    ThumbnailQuality::Hq,
    ThumbnailQuality::Mq,
    ThumbnailQuality::Default,
];

impl ThumbnailQuality {
    /// CDN file stem for this tier.
    pub fn file_stem(&self) -> &'static str {
        match self {
            ThumbnailQuality::Maxres => "maxresdefault",
            ThumbnailQuality::Sd => "sddefault",
            ThumbnailQuality::Hq => "hqdefault",
            ThumbnailQuality::Mq => "mqdefault",
            ThumbnailQuality::Default => "default",
        }
    }

    /// Nominal image dimensions for this tier. The CDN may serve a smaller
    /// placeholder for videos that never got a high-resolution thumbnail.
    pub fn nominal_size(&self) -> (u32, u32) {
        match self {
            ThumbnailQuality::Maxres => (1280, 720),
            ThumbnailQuality::Sd => (640, 480),
            ThumbnailQuality::Hq => (480, 360),
            ThumbnailQuality::Mq => (320, 180),
            ThumbnailQuality::Default => (120, 90),
        }
    }

    /// Short tag as it appears on the wire and in storage paths.
    pub fn tag(&self) -> &'static str {
        match self {
            ThumbnailQuality::Maxres => "maxres",
            ThumbnailQuality::Sd => "sd",
            ThumbnailQuality::Hq => "hq",
            ThumbnailQuality::Mq => "mq",
            ThumbnailQuality::Default => "default",
        }
    }

    /// Parse a quality tag as it appears on the wire ("maxres", "sd", ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "maxres" => Some(ThumbnailQuality::Maxres),
            "sd" => Some(ThumbnailQuality::Sd),
            "hq" => Some(ThumbnailQuality::Hq),
            "mq" => Some(ThumbnailQuality::Mq),
            "default" => Some(ThumbnailQuality::Default),
            _ => None,
        }
    }
}

/// A single thumbnail entry of a video's ladder.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    pub quality: ThumbnailQuality,
    pub url: String,
    pub dimensions: String,
    pub width: u32,
    pub height: u32,
}

/// The resolved ladder for one video, in quality order.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailSet {
    pub video_id: VideoId,
    pub video_title: String,
    pub thumbnails: Vec<Thumbnail>,
    pub total: usize,
}

/// Deterministic CDN URL for a video ID at a quality tier. Pure string
/// construction, no network.
pub fn thumbnail_url(video_id: &VideoId, quality: ThumbnailQuality) -> String {
    format!("{}/{}/{}.jpg", CDN_BASE, video_id, quality.file_stem())
}

/// Every ladder entry for a video, in ladder order.
pub fn all_qualities(video_id: &VideoId) -> Vec<Thumbnail> {
    QUALITY_LADDER
        .iter()
        .map(|&quality| {
            let (width, height) = quality.nominal_size();
            Thumbnail {
                quality,
                url: thumbnail_url(video_id, quality),
                dimensions: format!("{}x{}", width, height),
                width,
                height,
            }
        })
        .collect()
}
