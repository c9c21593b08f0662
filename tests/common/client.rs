//! HTTP client for end-to-end tests
//!
//! High-level wrapper over reqwest for all server endpoints. When routes or
//! request formats change, update only this file.

use reqwest::Response;
use serde_json::json;
use std::time::Duration;

use super::constants::REQUEST_TIMEOUT_SECS;

/// HTTP test client, optionally carrying an asserted user identity.
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    /// Value sent as `x-user-id`, if any
    user_id: Option<String>,
}

impl TestClient {
    /// Creates a new anonymous (guest) client.
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            user_id: None,
        }
    }

    /// Creates a client that carries a user identity, as the upstream auth
    /// proxy would.
    pub fn logged_in(base_url: String, user_id: &str) -> Self {
        let mut client = Self::new(base_url);
        client.user_id = Some(user_id.to_string());
        client
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.user_id {
            Some(user_id) => builder.header("x-user-id", user_id),
            None => builder,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn status(&self) -> Response {
        self.request(self.client.get(self.url("/v1/status")))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn resolve(&self, urls: &[&str]) -> Response {
        self.request(self.client.post(self.url("/v1/thumbnails/resolve")))
            .json(&json!({ "urls": urls }))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn download(&self, video_id: &str, quality: &str) -> Response {
        self.request(
            self.client
                .get(self.url(&format!("/v1/thumbnails/{}/{}", video_id, quality))),
        )
        .send()
        .await
        .expect("request failed")
    }

    pub async fn archive(&self, rows: serde_json::Value) -> Response {
        self.request(self.client.post(self.url("/v1/thumbnails/archive")))
            .json(&json!({ "rows": rows }))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn parse_csv(&self, filename: &str, content_type: &str, data: Vec<u8>) -> Response {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .expect("bad mime");
        let form = reqwest::multipart::Form::new().part("file", part);
        self.request(self.client.post(self.url("/v1/csv/parse")))
            .multipart(form)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn quota(&self) -> Response {
        self.request(self.client.get(self.url("/v1/quota")))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn list_folders(&self) -> Response {
        self.request(self.client.get(self.url("/v1/folders")))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn create_folder(&self, name: &str, tag: Option<&str>) -> Response {
        self.request(self.client.post(self.url("/v1/folders")))
            .json(&json!({ "name": name, "tag": tag }))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn update_folder(&self, id: &str, name: &str) -> Response {
        self.request(self.client.patch(self.url(&format!("/v1/folders/{}", id))))
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete_folder(&self, id: &str) -> Response {
        self.request(self.client.delete(self.url(&format!("/v1/folders/{}", id))))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn add_video_to_folder(&self, folder_id: &str, video_id: &str) -> Response {
        self.request(
            self.client
                .post(self.url(&format!("/v1/folders/{}/videos", folder_id))),
        )
        .json(&json!({
            "videoId": video_id,
            "videoUrl": format!("https://www.youtube.com/watch?v={}", video_id),
            "videoTitle": format!("Title of {}", video_id),
        }))
        .send()
        .await
        .expect("request failed")
    }

    pub async fn list_folder_videos(&self, folder_id: &str) -> Response {
        self.request(
            self.client
                .get(self.url(&format!("/v1/folders/{}/videos", folder_id))),
        )
        .send()
        .await
        .expect("request failed")
    }

    pub async fn remove_folder_video(&self, id: &str) -> Response {
        self.request(
            self.client
                .delete(self.url(&format!("/v1/folder-videos/{}", id))),
        )
        .send()
        .await
        .expect("request failed")
    }

    pub async fn list_history(&self, window: Option<&str>) -> Response {
        let url = match window {
            Some(window) => self.url(&format!("/v1/history?window={}", window)),
            None => self.url("/v1/history"),
        };
        self.request(self.client.get(url))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete_history_entry(&self, id: &str) -> Response {
        self.request(self.client.delete(self.url(&format!("/v1/history/{}", id))))
            .send()
            .await
            .expect("request failed")
    }
}
