//! ZIP packaging of bulk-fetched thumbnails.
//!
//! Rows are fetched through the orchestrator's fallback chain in fixed-size
//! batches and written into an in-memory archive. Failure is always per row:
//! a batch where nothing could be fetched still yields a valid (near-empty)
//! archive.

use futures::future::join_all;
use serde::Serialize;
use std::io::{Cursor, Write};
use thiserror::Error;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::csv_ingest::{ParsedCsvRow, RowStatus};
use crate::fetcher::{BatchOrchestrator, FetchedImage, DOWNLOAD_BATCH_SIZE};
use crate::youtube::VideoId;

/// Errors during archive assembly itself. Fetch failures never surface here.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Zip write error: {0}")]
    Zip(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress emitted after every row attempt, success or failure. Percent is
/// computed against the valid-row total, so it reaches 100 even when some
/// rows fail.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ZipProgress {
    pub current: usize,
    pub total: usize,
    pub percent: u32,
}

/// Callback invoked with progress updates during packaging.
pub type ProgressSink<'a> = &'a (dyn Fn(ZipProgress) + Send + Sync);

/// Packages fetched thumbnails into a single ZIP archive.
pub struct ZipPackager<'a> {
    orchestrator: &'a BatchOrchestrator,
}

impl<'a> ZipPackager<'a> {
    pub fn new(orchestrator: &'a BatchOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Fetch every valid row and assemble the archive.
    ///
    /// Rows run in batches of [`DOWNLOAD_BATCH_SIZE`]; a batch completes
    /// fully before the next starts, bounding simultaneous CDN connections.
    /// Rows with a folder label are placed under that folder inside the
    /// archive.
    pub async fn build_archive(
        &self,
        rows: &[ParsedCsvRow],
        on_progress: Option<ProgressSink<'_>>,
    ) -> Result<Vec<u8>, ArchiveError> {
        let valid_rows: Vec<&ParsedCsvRow> = rows
            .iter()
            .filter(|r| r.status == RowStatus::Valid && r.video_id.is_some())
            .collect();
        let total = valid_rows.len();

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        // Thumbnails are already JPEG-compressed, deflating them again buys
        // nothing.
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        let mut attempted = 0;
        for batch in valid_rows.chunks(DOWNLOAD_BATCH_SIZE) {
            let fetches = batch.iter().map(|row| {
                let video_id = row.video_id.as_ref().unwrap();
                self.orchestrator.fetch_image_with_fallback(video_id)
            });
            let outcomes = join_all(fetches).await;

            for (row, outcome) in batch.iter().zip(outcomes) {
                match outcome {
                    Ok(image) => {
                        let name = entry_name(row, &image);
                        writer
                            .start_file(name, options)
                            .map_err(|e| ArchiveError::Zip(e.to_string()))?;
                        writer.write_all(&image.bytes)?;
                    }
                    Err(err) => {
                        debug!("Skipping row {}: {}", row.row_index, err);
                    }
                }

                attempted += 1;
                if let Some(sink) = on_progress {
                    sink(ZipProgress {
                        current: attempted,
                        total,
                        percent: percent_of(attempted, total),
                    });
                }
            }
        }

        let cursor = writer.finish().map_err(|e| ArchiveError::Zip(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

fn percent_of(current: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    ((current as f64 / total as f64) * 100.0).round() as u32
}

/// Archive path for one fetched row: sanitized title (or a `video` stem)
/// suffixed with the video ID, under the row's folder label when present.
fn entry_name(row: &ParsedCsvRow, image: &FetchedImage) -> String {
    let filename = image_filename(row.title.as_deref(), &image.video_id);
    match row.folder.as_deref() {
        Some(folder) => format!("{}/{}", sanitize_component(folder), filename),
        None => filename,
    }
}

/// `{stem}-{id}.jpg`; the ID suffix keeps names unique under title
/// collisions.
fn image_filename(title: Option<&str>, video_id: &VideoId) -> String {
    let stem = match title {
        Some(title) => title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect(),
        None => "video".to_string(),
    };
    format!("{}-{}.jpg", stem, video_id)
}

/// Folder labels are free-form user input; strip path separators and other
/// characters archive extractors choke on.
fn sanitize_component(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect();
    let trimmed = sanitized.trim_start_matches('.').trim();
    if trimmed.is_empty() {
        "folder".to_string()
    } else {
        trimmed.to_string()
    }
}
