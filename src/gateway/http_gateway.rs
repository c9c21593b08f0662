//! HTTP client for the persistence service's CRUD API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use super::models::*;
use super::trait_def::HistoryFolderGateway;

/// Gateway over the persistence service's REST surface.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a new gateway client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the persistence service
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(base_url: String, timeout_sec: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn expect_success(
        response: Result<reqwest::Response, reqwest::Error>,
        url: &str,
    ) -> Result<reqwest::Response, GatewayError> {
        let response = response.map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HistoryFolderGateway for HttpGateway {
    async fn insert_history(&self, entries: &[NewHistoryEntry]) -> Result<(), GatewayError> {
        let url = self.url("/history");
        let response = self.client.post(&url).json(entries).send().await;
        Self::expect_success(response, &url).await?;
        Ok(())
    }

    async fn list_history(
        &self,
        user_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<HistoryEntry>, GatewayError> {
        let mut url = self.url(&format!("/users/{}/history", user_id));
        if let Some(since) = since {
            url.push_str(&format!("?since={}", urlencoding::encode(&since.to_rfc3339())));
        }
        let response = self.client.get(&url).send().await;
        Self::decode(Self::expect_success(response, &url).await?).await
    }

    async fn delete_history_entry(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.url(&format!("/history/{}", id));
        let response = self.client.delete(&url).send().await;
        Self::expect_success(response, &url).await?;
        Ok(())
    }

    async fn upload_thumbnail(&self, path: &str, bytes: Vec<u8>) -> Result<(), GatewayError> {
        let url = self.url(&format!("/storage/thumbnails/{}", path));
        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(bytes)
            .send()
            .await;
        Self::expect_success(response, &url).await?;
        Ok(())
    }

    async fn list_folders(&self, user_id: &str) -> Result<Vec<Folder>, GatewayError> {
        let url = self.url(&format!("/users/{}/folders", user_id));
        let response = self.client.get(&url).send().await;
        Self::decode(Self::expect_success(response, &url).await?).await
    }

    async fn create_folder(&self, user_id: &str, folder: NewFolder) -> Result<Folder, GatewayError> {
        let url = self.url(&format!("/users/{}/folders", user_id));
        let response = self.client.post(&url).json(&folder).send().await;
        Self::decode(Self::expect_success(response, &url).await?).await
    }

    async fn update_folder(&self, id: &str, folder: NewFolder) -> Result<Folder, GatewayError> {
        let url = self.url(&format!("/folders/{}", id));
        let response = self.client.patch(&url).json(&folder).send().await;
        Self::decode(Self::expect_success(response, &url).await?).await
    }

    async fn delete_folder(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.url(&format!("/folders/{}", id));
        let response = self.client.delete(&url).send().await;
        Self::expect_success(response, &url).await?;
        Ok(())
    }

    async fn add_video_to_folder(
        &self,
        user_id: &str,
        folder_id: &str,
        video: NewFolderVideo,
    ) -> Result<AddVideoOutcome, GatewayError> {
        let url = self.url(&format!("/folders/{}/videos", folder_id));
        let response = self
            .client
            .post(&url)
            .header("x-user-id", user_id)
            .json(&video)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        // The service signals the (folder, video) uniqueness violation with
        // a conflict status; that is an expected outcome, not a failure.
        if response.status() == reqwest::StatusCode::CONFLICT {
            return Ok(AddVideoOutcome::AlreadyExists);
        }
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(AddVideoOutcome::Added(Self::decode(response).await?))
    }

    async fn list_folder_videos(&self, folder_id: &str) -> Result<Vec<FolderVideo>, GatewayError> {
        let url = self.url(&format!("/folders/{}/videos", folder_id));
        let response = self.client.get(&url).send().await;
        Self::decode(Self::expect_success(response, &url).await?).await
    }

    async fn remove_video_from_folder(&self, id: &str) -> Result<(), GatewayError> {
        let url = self.url(&format!("/folder-videos/{}", id));
        let response = self.client.delete(&url).send().await;
        Self::expect_success(response, &url).await?;
        Ok(())
    }
}
