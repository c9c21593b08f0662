//! In-memory gateway used by tests and gateway-less runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use super::models::*;
use super::trait_def::HistoryFolderGateway;

#[derive(Default)]
struct MemoryState {
    history: Vec<HistoryEntry>,
    folders: Vec<Folder>,
    folder_videos: Vec<FolderVideo>,
    uploads: HashMap<String, Vec<u8>>,
}

/// Gateway keeping everything in process memory. Mirrors the service's
/// semantics, including the (folder, video) uniqueness constraint.
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<MemoryState>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes previously uploaded to a storage path, if any.
    pub fn uploaded(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().uploads.get(path).cloned()
    }

    /// Number of recorded history entries for a user. Handy for asserting on
    /// fire-and-forget writes without going through the async trait.
    pub fn history_len(&self, user_id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .history
            .iter()
            .filter(|e| e.user_id == user_id)
            .count()
    }

    fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl HistoryFolderGateway for InMemoryGateway {
    async fn insert_history(&self, entries: &[NewHistoryEntry]) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        for entry in entries {
            state.history.push(HistoryEntry {
                id: Self::new_id(),
                user_id: entry.user_id.clone(),
                video_id: entry.video_id.clone(),
                video_url: entry.video_url.clone(),
                video_title: entry.video_title.clone(),
                created_at: Utc::now(),
            });
        }
        Ok(())
    }

    async fn list_history(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>, GatewayError> {
        let state = self.state.lock().unwrap();
        let mut entries: Vec<HistoryEntry> = state
            .history
            .iter()
            .filter(|e| e.user_id == user_id)
            .filter(|e| since.map(|s| e.created_at >= s).unwrap_or(true))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn delete_history_entry(&self, id: &str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.history.retain(|e| e.id != id);
        Ok(())
    }

    async fn upload_thumbnail(&self, path: &str, bytes: Vec<u8>) -> Result<(), GatewayError> {
        // Upsert: overwriting an existing object is allowed
        self.state
            .lock()
            .unwrap()
            .uploads
            .insert(path.to_string(), bytes);
        Ok(())
    }

    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, GatewayError> {
        let state = self.state.lock().unwrap();
        let mut folders: Vec<Folder> = state
            .folders
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        folders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(folders)
    }

    async fn create_folder(&self, user_id: &str, folder: NewFolder) -> Result<Folder, GatewayError> {
        let now = Utc::now();
        let created = Folder {
            id: Self::new_id(),
            user_id: user_id.to_string(),
            name: folder.name,
            tag: folder.tag,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().folders.push(created.clone());
        Ok(created)
    }

    async fn update_folder(&self, id: &str, folder: NewFolder) -> Result<Folder, GatewayError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(GatewayError::Status {
                status: 404,
                url: format!("/folders/{}", id),
            })?;
        existing.name = folder.name;
        existing.tag = folder.tag;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete_folder(&self, id: &str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.folders.retain(|f| f.id != id);
        state.folder_videos.retain(|v| v.folder_id != id);
        Ok(())
    }

    async fn add_video_to_folder(
        &self,
        user_id: &str,
        folder_id: &str,
        video: NewFolderVideo,
    ) -> Result<AddVideoOutcome, GatewayError> {
        let mut state = self.state.lock().unwrap();
        let duplicate = state
            .folder_videos
            .iter()
            .any(|v| v.folder_id == folder_id && v.video_id == video.video_id);
        if duplicate {
            return Ok(AddVideoOutcome::AlreadyExists);
        }
        let created = FolderVideo {
            id: Self::new_id(),
            user_id: user_id.to_string(),
            folder_id: folder_id.to_string(),
            video_id: video.video_id,
            video_url: video.video_url,
            video_title: video.video_title,
            created_at: Utc::now(),
        };
        state.folder_videos.push(created.clone());
        Ok(AddVideoOutcome::Added(created))
    }

    async fn list_folder_videos(&self, folder_id: &str) -> Result<Vec<FolderVideo>, GatewayError> {
        let state = self.state.lock().unwrap();
        let mut videos: Vec<FolderVideo> = state
            .folder_videos
            .iter()
            .filter(|v| v.folder_id == folder_id)
            .cloned()
            .collect();
        videos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(videos)
    }

    async fn remove_video_from_folder(&self, id: &str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.folder_videos.retain(|v| v.id != id);
        Ok(())
    }
}
