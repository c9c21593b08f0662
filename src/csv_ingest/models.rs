use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::youtube::VideoId;

/// Errors that fail the whole parse before any row is produced.
#[derive(Debug, Error)]
pub enum CsvIngestError {
    #[error("File too large: {0} rows (max: {1})")]
    FileTooLarge(usize, usize),

    #[error("File is empty")]
    EmptyFile,

    #[error("Malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
}

/// Validation outcome of a single data row.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Valid,
    Invalid,
    Duplicate,
}

/// One data row of the uploaded file, validated.
///
/// `status` is `Valid` iff a video ID was extracted and this row is its first
/// occurrence in the file; `Duplicate` iff the ID was extracted but already
/// seen on an earlier row; `Invalid` iff no ID could be extracted.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCsvRow {
    /// 1-based position in the file, counting the header line if one was
    /// consumed.
    pub row_index: usize,
    pub raw_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<VideoId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of parsing one uploaded file.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    /// Number of data rows inspected (header excluded).
    pub raw_count: usize,
    pub rows: Vec<ParsedCsvRow>,
    pub duplicates_removed: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
}
