//! sm-slack: Slack Web API client for slack-mcp
//!
//! Slack Web API への認証済み HTTP 呼び出しと、レスポンスの正規化を提供します。
//! すべての操作は単一の `call` プリミティブの上に構築されています。

pub mod api;
pub mod error;
pub mod types;
pub mod upload;

pub use api::{SlackApiClient, DEFAULT_BASE_URL};
pub use error::{Result, SlackError};
pub use types::{
    sort_by_ts, AuthTestResponse, HistoryQuery, PostMessageResponse, SearchMatch, SearchSort, SlackChannel,
    SlackMessage, SlackUser, UploadRequest, UploadedFile,
};
