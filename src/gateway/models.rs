use chrono::{DateTime, Duration, Local, Months, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::youtube::VideoId;

/// Errors talking to the persistence service.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed response: {0}")]
    Decode(String),
}

/// One recorded search or download of an authenticated user. Never mutated;
/// deleted only by explicit user action.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: String,
    pub video_id: VideoId,
    pub video_url: String,
    pub video_title: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for recording a history entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistoryEntry {
    pub user_id: String,
    pub video_id: VideoId,
    pub video_url: String,
    pub video_title: String,
}

/// A user-defined collection of saved videos.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or renaming a folder.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFolder {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// A video saved into a folder. Unique per (folder, video).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderVideo {
    pub id: String,
    pub user_id: String,
    pub folder_id: String,
    pub video_id: VideoId,
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for saving a video into a folder.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFolderVideo {
    pub video_id: VideoId,
    pub video_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
}

/// Outcome of saving a video into a folder. The service enforces the
/// (folder, video) uniqueness constraint; hitting it is an expected,
/// recoverable outcome, not an error.
#[derive(Clone, Debug)]
pub enum AddVideoOutcome {
    Added(FolderVideo),
    AlreadyExists,
}

/// Time window for the history listing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryWindow {
    Hour,
    Day,
    Week,
    Month,
    All,
}

impl HistoryWindow {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hour" => Some(HistoryWindow::Hour),
            "day" => Some(HistoryWindow::Day),
            "week" => Some(HistoryWindow::Week),
            "month" => Some(HistoryWindow::Month),
            "all" => Some(HistoryWindow::All),
            _ => None,
        }
    }

    /// Oldest timestamp included in the window, or `None` for no bound.
    ///
    /// `Day` means the current calendar day since local midnight, not a
    /// trailing 24-hour window; the guest-quota reset follows the same
    /// convention.
    pub fn cutoff(&self, now: DateTime<Local>) -> Option<DateTime<Utc>> {
        let cutoff = match self {
            HistoryWindow::Hour => now - Duration::hours(1),
            HistoryWindow::Day => now
                .date_naive()
                .and_time(NaiveTime::MIN)
                .and_local_timezone(Local)
                .earliest()
                // A zone can skip midnight on a DST day; fall back to the
                // trailing day.
                .unwrap_or(now - Duration::hours(24)),
            HistoryWindow::Week => now - Duration::weeks(1),
            HistoryWindow::Month => now - Months::new(1),
            HistoryWindow::All => return None,
        };
        Some(cutoff.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local_noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 15, 12, 30, 45).unwrap()
    }

    #[test]
    fn test_day_window_starts_at_local_midnight() {
        let cutoff = HistoryWindow::Day.cutoff(local_noon()).unwrap();
        let local_cutoff = cutoff.with_timezone(&Local);
        assert_eq!(local_cutoff.date_naive(), local_noon().date_naive());
        assert_eq!(local_cutoff.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_hour_window_is_trailing() {
        let now = local_noon();
        let cutoff = HistoryWindow::Hour.cutoff(now).unwrap();
        assert_eq!(now.with_timezone(&Utc) - cutoff, Duration::hours(1));
    }

    #[test]
    fn test_all_window_is_unbounded() {
        assert_eq!(HistoryWindow::All.cutoff(local_noon()), None);
    }

    #[test]
    fn test_window_tags() {
        assert_eq!(HistoryWindow::from_tag("day"), Some(HistoryWindow::Day));
        assert_eq!(HistoryWindow::from_tag("all"), Some(HistoryWindow::All));
        assert_eq!(HistoryWindow::from_tag("decade"), None);
    }
}
