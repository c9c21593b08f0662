use anyhow::Result;
use std::time::{Duration, Instant};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tracing::warn;

use super::state::*;
use super::{log_requests, ServerConfig, UserIdentity};
use crate::archive::ZipPackager;
use crate::csv_ingest::{is_accepted_csv_upload, parse_csv, CsvIngestError, ParsedCsvRow};
use crate::fetcher::FetchError;
use crate::gateway::{
    thumbnail_storage_path, AddVideoOutcome, GatewayError, HistoryFolderGateway, HistoryWindow,
    NewFolder, NewFolderVideo, NewHistoryEntry,
};
use crate::youtube::{ThumbnailQuality, VideoId};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

fn error_body(message: &str) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": message }))
}

fn quota_exceeded() -> Response {
    (
        StatusCode::FORBIDDEN,
        error_body("Daily guest download limit reached. Sign in to continue."),
    )
        .into_response()
}

fn require_user(identity: &UserIdentity) -> Result<String, Response> {
    identity.user_id.clone().ok_or_else(|| {
        (StatusCode::UNAUTHORIZED, error_body("You must be logged in")).into_response()
    })
}

fn require_gateway(
    state: &ServerState,
) -> Result<std::sync::Arc<dyn HistoryFolderGateway>, Response> {
    state.gateway.clone().ok_or_else(|| {
        (
            StatusCode::NOT_IMPLEMENTED,
            error_body("No persistence service configured"),
        )
            .into_response()
    })
}

/// Gateway failures on read/write paths the user asked for directly.
fn gateway_error(err: GatewayError) -> Response {
    warn!("Persistence gateway error: {}", err);
    match err {
        GatewayError::Status { status: 404, .. } => {
            (StatusCode::NOT_FOUND, error_body("Not found")).into_response()
        }
        _ => (StatusCode::BAD_GATEWAY, error_body("Persistence service unavailable"))
            .into_response(),
    }
}

async fn status(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// === Thumbnails ===

#[derive(Deserialize, Debug)]
struct ResolveBody {
    pub urls: Vec<String>,
}

async fn resolve_thumbnails(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Json(body): Json<ResolveBody>,
) -> Response {
    let report = state.orchestrator.resolve_metadata(&body.urls).await;

    // Record search history for logged-in users: best-effort and off the
    // response path, a persistence hiccup must not hide the thumbnails.
    if let (Some(user_id), Some(gateway)) = (identity.user_id, state.gateway.clone()) {
        let entries: Vec<NewHistoryEntry> = report
            .results
            .iter()
            .map(|set| NewHistoryEntry {
                user_id: user_id.clone(),
                video_id: set.video_id.clone(),
                video_url: set.video_id.watch_url(),
                video_title: set.video_title.clone(),
            })
            .collect();
        if !entries.is_empty() {
            tokio::spawn(async move {
                if let Err(err) = gateway.insert_history(&entries).await {
                    warn!("Failed to record search history: {}", err);
                }
            });
        }
    }

    Json(report).into_response()
}

async fn download_thumbnail(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Path((video_id, quality)): Path<(String, String)>,
) -> Response {
    let video_id = match VideoId::parse(&video_id) {
        Some(id) => id,
        None => return (StatusCode::BAD_REQUEST, error_body("Invalid video ID")).into_response(),
    };
    let quality = match ThumbnailQuality::from_tag(&quality) {
        Some(q) => q,
        None => return (StatusCode::BAD_REQUEST, error_body("Unknown quality tag")).into_response(),
    };

    if !state.quota.try_consume(identity.is_logged_in()) {
        return quota_exceeded();
    }

    let image = match state.orchestrator.fetch_single(&video_id, quality).await {
        Ok(image) => image,
        Err(FetchError::Status { status: 404, .. }) | Err(FetchError::EmptyBody(_)) => {
            return (
                StatusCode::NOT_FOUND,
                error_body("No thumbnail at this quality"),
            )
                .into_response();
        }
        Err(err) => {
            warn!("Thumbnail fetch failed for {}: {}", video_id, err);
            return (StatusCode::BAD_GATEWAY, error_body("Thumbnail CDN unavailable"))
                .into_response();
        }
    };

    // Mirror the download into the user's storage and history, off the
    // response path.
    if let (Some(user_id), Some(gateway)) = (identity.user_id, state.gateway.clone()) {
        let bytes = image.bytes.clone();
        let entry = NewHistoryEntry {
            user_id: user_id.clone(),
            video_id: video_id.clone(),
            video_url: video_id.watch_url(),
            video_title: format!("Video {}", video_id),
        };
        let path = thumbnail_storage_path(&user_id, &video_id, quality);
        tokio::spawn(async move {
            if let Err(err) = gateway.upload_thumbnail(&path, bytes).await {
                warn!("Failed to upload thumbnail copy: {}", err);
            }
            if let Err(err) = gateway.insert_history(&[entry]).await {
                warn!("Failed to record download history: {}", err);
            }
        });
    }

    (
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!(
                    "attachment; filename=\"{}-{}.jpg\"",
                    image.video_id,
                    quality.tag()
                ),
            ),
        ],
        image.bytes,
    )
        .into_response()
}

#[derive(Deserialize, Debug)]
struct ArchiveBody {
    pub rows: Vec<ParsedCsvRow>,
}

async fn build_archive(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Json(body): Json<ArchiveBody>,
) -> Response {
    if !state.quota.try_consume(identity.is_logged_in()) {
        return quota_exceeded();
    }

    let packager = ZipPackager::new(&state.orchestrator);
    match packager.build_archive(&body.rows, None).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"thumbnails.zip\"".to_string(),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(err) => {
            warn!("Archive assembly failed: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, error_body("Failed to build archive"))
                .into_response()
        }
    }
}

// === CSV upload ===

async fn parse_csv_upload(mut multipart: Multipart) -> Response {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return (StatusCode::BAD_REQUEST, error_body("No file uploaded")).into_response()
            }
            Err(err) => {
                return (StatusCode::BAD_REQUEST, error_body(&format!("Bad upload: {}", err)))
                    .into_response()
            }
        };

        let filename = match field.file_name() {
            Some(filename) => filename.to_string(),
            None => continue, // not the file part
        };
        let content_type = field.content_type().map(str::to_string);
        if !is_accepted_csv_upload(&filename, content_type.as_deref()) {
            return (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                error_body("Please select a valid .csv file"),
            )
                .into_response();
        }

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(err) => {
                return (StatusCode::BAD_REQUEST, error_body(&format!("Bad upload: {}", err)))
                    .into_response()
            }
        };

        return match parse_csv(&data) {
            Ok(report) => Json(report).into_response(),
            Err(err @ CsvIngestError::FileTooLarge(_, _)) => {
                (StatusCode::PAYLOAD_TOO_LARGE, error_body(&err.to_string())).into_response()
            }
            Err(err) => (StatusCode::BAD_REQUEST, error_body(&err.to_string())).into_response(),
        };
    }
}

// === Quota ===

#[derive(Serialize)]
struct QuotaResponse {
    pub remaining: u32,
}

async fn quota_remaining(identity: UserIdentity, State(state): State<ServerState>) -> Response {
    Json(QuotaResponse {
        remaining: state.quota.remaining(identity.is_logged_in()),
    })
    .into_response()
}

// === Folders ===

async fn list_folders(identity: UserIdentity, State(state): State<ServerState>) -> Response {
    let user_id = match require_user(&identity) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };
    match gateway.list_folders(&user_id).await {
        Ok(folders) => Json(folders).into_response(),
        Err(err) => gateway_error(err),
    }
}

async fn create_folder(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Json(body): Json<NewFolder>,
) -> Response {
    let user_id = match require_user(&identity) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };
    match gateway.create_folder(&user_id, body).await {
        Ok(folder) => (StatusCode::CREATED, Json(folder)).into_response(),
        Err(err) => gateway_error(err),
    }
}

async fn update_folder(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<NewFolder>,
) -> Response {
    if let Err(response) = require_user(&identity) {
        return response;
    }
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };
    match gateway.update_folder(&id, body).await {
        Ok(folder) => Json(folder).into_response(),
        Err(err) => gateway_error(err),
    }
}

async fn delete_folder(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_user(&identity) {
        return response;
    }
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };
    match gateway.delete_folder(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => gateway_error(err),
    }
}

async fn list_folder_videos(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_user(&identity) {
        return response;
    }
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };
    match gateway.list_folder_videos(&id).await {
        Ok(videos) => Json(videos).into_response(),
        Err(err) => gateway_error(err),
    }
}

async fn add_video_to_folder(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<NewFolderVideo>,
) -> Response {
    let user_id = match require_user(&identity) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };
    match gateway.add_video_to_folder(&user_id, &id, body).await {
        Ok(AddVideoOutcome::Added(video)) => (StatusCode::CREATED, Json(video)).into_response(),
        Ok(AddVideoOutcome::AlreadyExists) => (
            StatusCode::CONFLICT,
            error_body("Video already in this folder"),
        )
            .into_response(),
        Err(err) => gateway_error(err),
    }
}

async fn remove_folder_video(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_user(&identity) {
        return response;
    }
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };
    match gateway.remove_video_from_folder(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => gateway_error(err),
    }
}

// === History ===

#[derive(Deserialize, Debug)]
struct HistoryQuery {
    pub window: Option<String>,
}

async fn list_history(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    let user_id = match require_user(&identity) {
        Ok(user_id) => user_id,
        Err(response) => return response,
    };
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };

    let window = match query.window.as_deref() {
        None => HistoryWindow::Day,
        Some(tag) => match HistoryWindow::from_tag(tag) {
            Some(window) => window,
            None => {
                return (StatusCode::BAD_REQUEST, error_body("Unknown history window"))
                    .into_response()
            }
        },
    };

    match gateway.list_history(&user_id, window.cutoff(Local::now())).await {
        Ok(entries) => Json(entries).into_response(),
        Err(err) => gateway_error(err),
    }
}

async fn delete_history_entry(
    identity: UserIdentity,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Response {
    if let Err(response) = require_user(&identity) {
        return response;
    }
    let gateway = match require_gateway(&state) {
        Ok(gateway) => gateway,
        Err(response) => return response,
    };
    match gateway.delete_history_entry(&id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => gateway_error(err),
    }
}

// === App assembly ===

pub fn make_app(
    config: ServerConfig,
    orchestrator: SharedOrchestrator,
    quota: SharedQuota,
    gateway: OptionalGateway,
) -> Router {
    let state = ServerState {
        config,
        start_time: Instant::now(),
        orchestrator,
        quota,
        gateway,
    };

    let mut app = Router::new()
        .route("/v1/status", get(status))
        .route("/v1/thumbnails/resolve", post(resolve_thumbnails))
        .route("/v1/thumbnails/archive", post(build_archive))
        .route("/v1/thumbnails/{video_id}/{quality}", get(download_thumbnail))
        .route("/v1/csv/parse", post(parse_csv_upload))
        .route("/v1/quota", get(quota_remaining))
        .route("/v1/folders", get(list_folders).post(create_folder))
        .route("/v1/folders/{id}", axum::routing::patch(update_folder).delete(delete_folder))
        .route(
            "/v1/folders/{id}/videos",
            get(list_folder_videos).post(add_video_to_folder),
        )
        .route("/v1/folder-videos/{id}", delete(remove_folder_video))
        .route("/v1/history", get(list_history))
        .route("/v1/history/{id}", delete(delete_history_entry));

    if let Some(frontend_path) = state.config.frontend_dir_path.clone() {
        let static_files_service =
            ServeDir::new(frontend_path).append_index_html_on_directories(true);
        app = app.fallback_service(static_files_service);
    }

    app.layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state)
}

pub async fn run_server(
    config: ServerConfig,
    orchestrator: SharedOrchestrator,
    quota: SharedQuota,
    gateway: OptionalGateway,
) -> Result<()> {
    let port = config.port;
    let app = make_app(config, orchestrator, quota, gateway);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}
