//! Slack API types
//!
//! `Raw*` types mirror the Web API payloads; the public types are the
//! flattened shapes handed to callers.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A message in a channel, DM or thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackMessage {
    pub text: String,
    /// Author user ID
    pub user: String,
    /// Fixed-point seconds since epoch, e.g. "1690000000.000100"
    pub ts: String,
    pub channel: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
}

impl SlackMessage {
    /// Numeric value of `ts`, NaN when the timestamp does not parse
    pub fn ts_value(&self) -> f64 {
        self.ts.parse().unwrap_or(f64::NAN)
    }
}

/// Sort messages oldest first.
///
/// Stable for equal timestamps; unparseable timestamps go last.
pub fn sort_by_ts(messages: &mut [SlackMessage]) {
    messages.sort_by(|a, b| {
        let (a, b) = (a.ts_value(), b.ts_value());
        match (a.is_nan(), b.is_nan()) {
            (false, false) => a.total_cmp(&b),
            (a_nan, b_nan) => a_nan.cmp(&b_nan),
        }
    });
}

/// Slack channel info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
    pub is_private: bool,
    pub is_member: bool,
    pub topic: Option<String>,
    pub purpose: Option<String>,
    pub num_members: Option<u64>,
}

/// Slack user info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlackUser {
    pub id: String,
    /// Handle (@name)
    pub name: String,
    pub real_name: String,
    pub email: Option<String>,
    pub is_bot: bool,
    pub is_admin: bool,
    /// Status text
    pub status: Option<String>,
}

impl SlackUser {
    /// "Real Name (@handle)", or just the handle when no real name is set
    pub fn display(&self) -> String {
        if self.real_name.is_empty() {
            format!("@{}", self.name)
        } else {
            format!("{} (@{})", self.real_name, self.name)
        }
    }
}

/// Parameters for `conversations.history`
#[derive(Debug, Clone, Default)]
pub struct HistoryQuery {
    pub channel_id: String,
    pub limit: u32,
    pub oldest: Option<String>,
    pub latest: Option<String>,
}

impl HistoryQuery {
    pub fn new(channel_id: impl Into<String>, limit: u32) -> Self {
        Self {
            channel_id: channel_id.into(),
            limit,
            ..Default::default()
        }
    }
}

/// Sort order for `search.messages`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchSort {
    #[default]
    Timestamp,
    Score,
}

impl SearchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Score => "score",
        }
    }
}

/// One hit from `search.messages`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    #[serde(default)]
    pub text: String,
    /// Author user ID
    #[serde(default)]
    pub user: Option<String>,
    /// Author handle
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub channel: SearchChannel,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub permalink: Option<String>,
}

impl SearchMatch {
    /// Handle if present, then user ID, then "unknown"
    pub fn author(&self) -> &str {
        self.username
            .as_deref()
            .or(self.user.as_deref())
            .filter(|s| !s.is_empty())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchChannel {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// File upload request.
///
/// `channels` may hold conversation IDs or bare channel names; names are
/// resolved through `conversations.list` before uploading.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub channels: Vec<String>,
    pub file_path: PathBuf,
    pub title: Option<String>,
    pub initial_comment: Option<String>,
}

/// File descriptor returned by `files.completeUploadExternal`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// Auth test response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTestResponse {
    #[serde(default)]
    pub url: String,
    pub team: String,
    pub user: String,
    pub team_id: String,
    pub user_id: String,
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// Post message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMessageResponse {
    pub ts: String,
    pub channel: String,
}

// ============================================================================
// Wire payloads
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RawMessage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
}

impl RawMessage {
    pub fn into_message(self, channel: &str, missing_user: &str) -> SlackMessage {
        SlackMessage {
            text: self.text,
            user: self.user.unwrap_or_else(|| missing_user.to_string()),
            ts: self.ts,
            channel: channel.to_string(),
            user_name: None,
            thread_ts: self.thread_ts,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TextValue {
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub topic: Option<TextValue>,
    #[serde(default)]
    pub purpose: Option<TextValue>,
    #[serde(default)]
    pub num_members: Option<u64>,
}

fn flatten_text(value: Option<TextValue>) -> Option<String> {
    value.and_then(|t| t.value).filter(|v| !v.is_empty())
}

impl From<RawChannel> for SlackChannel {
    fn from(raw: RawChannel) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            is_private: raw.is_private,
            is_member: raw.is_member,
            topic: flatten_text(raw.topic),
            purpose: flatten_text(raw.purpose),
            num_members: raw.num_members,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawProfile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub profile: RawProfile,
}

impl From<RawUser> for SlackUser {
    fn from(raw: RawUser) -> Self {
        Self {
            id: raw.id,
            name: raw.name,
            real_name: raw.real_name.unwrap_or_default(),
            email: raw.profile.email.filter(|e| !e.is_empty()),
            is_bot: raw.is_bot,
            is_admin: raw.is_admin,
            status: raw.profile.status_text.filter(|s| !s.is_empty()),
        }
    }
}
