//! HistoryFolderGateway trait definition.
//!
//! Everything behind this trait is owned by the persistence service: the
//! client never assumes exclusive write access and treats uniqueness
//! conflicts as a normal outcome.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::models::*;
use crate::youtube::{ThumbnailQuality, VideoId};

/// Storage object path for an uploaded thumbnail:
/// `{user_id}/{video_id}/{quality}.jpg`.
pub fn thumbnail_storage_path(user_id: &str, video_id: &VideoId, quality: ThumbnailQuality) -> String {
    format!("{}/{}/{}.jpg", user_id, video_id, quality.tag())
}

/// Client boundary to the persistence service.
#[async_trait]
pub trait HistoryFolderGateway: Send + Sync {
    // === History ===

    /// Record search/download history entries. Best-effort: callers log
    /// failures and move on, they never surface as blocking errors.
    async fn insert_history(&self, entries: &[NewHistoryEntry]) -> Result<(), GatewayError>;

    /// List a user's history, newest first, optionally bounded below.
    async fn list_history(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>, GatewayError>;

    /// Delete one history entry.
    async fn delete_history_entry(&self, id: &str) -> Result<(), GatewayError>;

    // === Thumbnail storage ===

    /// Upload thumbnail bytes to object storage. Upsert semantics: an
    /// existing object at the same path is overwritten.
    async fn upload_thumbnail(&self, path: &str, bytes: Vec<u8>) -> Result<(), GatewayError>;

    // === Folders ===

    /// List a user's folders, newest first.
    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, GatewayError>;

    async fn create_folder(&self, user_id: &str, folder: NewFolder) -> Result<Folder, GatewayError>;

    async fn update_folder(&self, id: &str, folder: NewFolder) -> Result<Folder, GatewayError>;

    async fn delete_folder(&self, id: &str) -> Result<(), GatewayError>;

    // === Folder videos ===

    /// Save a video into a folder. A (folder, video) pair that already
    /// exists yields [`AddVideoOutcome::AlreadyExists`], not an error.
    async fn add_video_to_folder(
        &self,
        user_id: &str,
        folder_id: &str,
        video: NewFolderVideo,
    ) -> Result<AddVideoOutcome, GatewayError>;

    /// List the videos saved in a folder, newest first.
    async fn list_folder_videos(&self, folder_id: &str) -> Result<Vec<FolderVideo>, GatewayError>;

    /// Remove one saved video by its row ID.
    async fn remove_video_from_folder(&self, id: &str) -> Result<(), GatewayError>;
}
