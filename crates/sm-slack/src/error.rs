//! エラー型定義 (sm-slack)

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// sm-slack のエラー型
#[derive(Error, Debug)]
pub enum SlackError {
    /// Connection, timeout or non-2xx status from the Web API
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body was not the JSON envelope the Web API promises
    #[error("JSON decode error: {0}")]
    Decode(String),

    /// Well-formed response with `ok: false`
    #[error("Slack API error: {error}")]
    Api {
        error: String,
        response: Option<Value>,
    },

    /// `missing_scope` / `not_allowed_token_type`, rewritten with remediation
    #[error(
        "Missing permission to {operation} ({error}). Add the '{scope}' scope to the Slack app's OAuth scopes and reinstall the app."
    )]
    MissingScope {
        operation: &'static str,
        scope: &'static str,
        error: String,
    },

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("File upload failed: HTTP {status}")]
    UploadRejected { status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Slack token not configured")]
    TokenNotConfigured,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SlackError {
    /// Service error tag when the remote rejected the call
    pub fn api_error(&self) -> Option<&str> {
        match self {
            Self::Api { error, .. } | Self::MissingScope { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Raw response payload, if the remote returned one
    pub fn response(&self) -> Option<&Value> {
        match self {
            Self::Api { response, .. } => response.as_ref(),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Rewrite a permission failure into remediation guidance.
    ///
    /// Only errors whose tag is in `tags` are rewritten; everything else
    /// passes through untouched.
    pub(crate) fn with_scope_hint(
        self,
        tags: &[&str],
        operation: &'static str,
        scope: &'static str,
    ) -> Self {
        match self {
            Self::Api { error, .. } if tags.contains(&error.as_str()) => Self::MissingScope {
                operation,
                scope,
                error,
            },
            other => other,
        }
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, SlackError>;
