//! Video ID extraction from free-form user input.
//!
//! YouTube video IDs are 11 characters drawn from `[A-Za-z0-9_-]`. Input can
//! be a bare ID or any of the common URL shapes (watch, youtu.be, embed,
//! shorts, legacy /v/ and /e/ paths).

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

lazy_static! {
    /// Matches a bare 11-character video ID.
    static ref BARE_ID_RE: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap();

    /// One permissive pattern over all supported URL shapes. The capture must
    /// be exactly 11 ID-alphabet characters and must be followed by a non-ID
    /// character or the end of the string, so trailing query or path segments
    /// never bleed into the ID.
    static ref URL_ID_RE: Regex = Regex::new(
        r"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e|embed)/|.*[?&]v=|shorts/)|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)"
    )
    .unwrap();
}

/// A validated 11-character YouTube video ID.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

/// Deserializing validates, so an ID arriving over the wire is as trustworthy
/// as one produced by extraction.
impl<'de> Deserialize<'de> for VideoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        VideoId::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid video ID: {:?}", raw)))
    }
}

impl VideoId {
    /// Validate a string as a video ID.
    pub fn parse(s: &str) -> Option<Self> {
        if BARE_ID_RE.is_match(s) {
            Some(VideoId(s.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL for this video.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract a video ID from free-form input.
///
/// Accepts a bare 11-character ID verbatim, otherwise matches the input
/// against the supported URL shapes. Returns `None` for empty input,
/// non-YouTube URLs and malformed IDs. Never panics.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Some(id) = VideoId::parse(input) {
        return Some(id);
    }

    URL_ID_RE
        .captures(input)
        .map(|caps| VideoId(caps[1].to_string()))
}
