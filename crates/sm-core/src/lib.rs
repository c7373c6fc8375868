//! sm-core: shared configuration and error types for slack-mcp
//!
//! Slack ボットトークン、API エンドポイント、サーバー設定の読み込みを提供します。

pub mod config;
pub mod error;

pub use config::{Config, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ServerConfig, SlackConfig};
pub use error::{Error, Result};
