//! YouTube identifiers and thumbnail URL construction.

mod thumbnails;
mod video_id;

pub use thumbnails::{
    all_qualities, thumbnail_url, Thumbnail, ThumbnailQuality, ThumbnailSet, QUALITY_LADDER,
};
pub use video_id::{extract_video_id, VideoId};
