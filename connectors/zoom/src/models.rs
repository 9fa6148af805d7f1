use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Deserialize;
use std::fmt;

use crate::error::{Result, ZoomError};

const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw `GET /users/{email}` response. Fields are optional so that a missing
/// one surfaces as an authentication error instead of a parse error.
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfileResponse {
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl TryFrom<UserProfileResponse> for UserProfile {
    type Error = ZoomError;

    fn try_from(raw: UserProfileResponse) -> Result<Self> {
        fn field(value: Option<String>, name: &str) -> Result<String> {
            value.filter(|v| !v.is_empty()).ok_or_else(|| {
                ZoomError::Authentication(format!("Profile response is missing '{}'", name))
            })
        }

        Ok(Self {
            id: field(raw.id, "id")?,
            first_name: field(raw.first_name, "first_name")?,
            last_name: field(raw.last_name, "last_name")?,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingsResponse {
    #[serde(default)]
    pub meetings: Vec<Meeting>,
    pub next_page_token: Option<String>,
    pub total_records: Option<u64>,
}

impl RecordingsResponse {
    pub fn has_more_pages(&self) -> bool {
        self.next_page_token
            .as_deref()
            .map(|t| !t.is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub topic: Option<String>,
    #[serde(default)]
    pub recording_files: Vec<RecordingFile>,
}

/// Zoom returns numeric meeting ids; older payloads carry them as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MeetingId {
    Number(u64),
    Text(String),
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeetingId::Number(n) => write!(f, "{}", n),
            MeetingId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordingFile {
    pub download_url: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub file_size: u64,
    pub recording_start: String,
}

impl RecordingFile {
    /// Parses `recording_start`, requiring a zero UTC offset.
    pub fn recording_start_utc(&self) -> Result<DateTime<Utc>> {
        let parsed = DateTime::parse_from_rfc3339(&self.recording_start).map_err(|e| {
            ZoomError::InvalidTimestamp(format!("'{}': {}", self.recording_start, e))
        })?;

        if parsed.offset().local_minus_utc() != 0 {
            return Err(ZoomError::InvalidTimestamp(format!(
                "'{}' is not in UTC",
                self.recording_start
            )));
        }

        Ok(parsed.with_timezone(&Utc))
    }
}

/// Inclusive calendar-date range used for one listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn from_param(&self) -> String {
        self.from.format(API_DATE_FORMAT).to_string()
    }

    pub fn to_param(&self) -> String {
        self.to.format(API_DATE_FORMAT).to_string()
    }

    pub fn len_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from_param(), self.to_param())
    }
}

/// Walks `count` windows of `size_days` backward from `today`, most recent
/// first. Window `i` covers `[today - (i+1)*size + 1, today - i*size]`.
pub fn date_windows(today: NaiveDate, count: u32, size_days: u32) -> Vec<DateWindow> {
    if size_days == 0 {
        return Vec::new();
    }

    let size = i64::from(size_days);
    (0..i64::from(count))
        .map(|i| DateWindow {
            from: today - Days::new((((i + 1) * size) - 1) as u64),
            to: today - Days::new((i * size) as u64),
        })
        .collect()
}
