//! Configuration management
//!
//! 設定は以下の優先順位で読み込まれます:
//! 1. 環境変数
//! 2. slack-mcp.toml 設定ファイル
//! 3. デフォルト値
//!
//! 設定ファイル内では `${VAR_NAME}` 形式で環境変数を展開できます。

use serde::Deserialize;
use std::path::Path;

use crate::{Error, Result};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "slack-mcp.toml";

/// Slack Web API endpoint
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Slack Web API settings
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// Bot User OAuth token (xoxb-...)
    pub bot_token: String,

    /// Base URL of the Web API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// MCP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Name advertised to MCP clients
    pub name: String,

    /// Default tracing filter when RUST_LOG is not set
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            log_level: default_log_level(),
        }
    }
}

/// Main configuration for slack-mcp
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub slack: SlackConfig,
    pub server: ServerConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_server_name() -> String {
    "Slack MCP Server".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// 文字列中の `${VAR_NAME}` を環境変数の値に置換する
    ///
    /// 環境変数が存在しない場合は空文字列になります。
    fn expand_env_vars(value: &str, lookup: &impl Fn(&str) -> Option<String>) -> String {
        let mut result = String::with_capacity(value.len());
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Some(env_value) = lookup(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// TOML 文字列から設定を構築する (環境変数による上書きなし)
    fn parse_toml(content: &str, lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let expanded = Self::expand_env_vars(content, lookup);
        let toml: TomlConfig = toml::from_str(&expanded)?;

        let slack = toml.slack.unwrap_or_default();
        let server = toml.server.unwrap_or_default();

        Ok(Config {
            slack: SlackConfig {
                bot_token: slack.bot_token.unwrap_or_default(),
                base_url: slack.base_url.unwrap_or_else(default_base_url),
                timeout_secs: slack.timeout_secs.unwrap_or_else(default_timeout_secs),
            },
            server: ServerConfig {
                name: server.name.unwrap_or_else(default_server_name),
                log_level: server.log_level.unwrap_or_else(default_log_level),
            },
        })
    }

    /// TOML 設定ファイルから設定を読み込む
    ///
    /// ファイルの値は環境変数で上書きされます。
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading configuration file");

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        Self::from_toml_str(&content, |name| std::env::var(name).ok())
    }

    /// TOML 文字列から設定を構築し、変数で上書きする
    fn from_toml_str(content: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::parse_toml(content, &lookup)?;
        cfg.apply_overrides(&lookup);
        cfg.validate()?;
        Ok(cfg)
    }

    /// デフォルトパスから設定を読み込む
    ///
    /// `./slack-mcp.toml` があればそれを使い、なければ環境変数のみを使います。
    pub fn load() -> Result<Self> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_overrides(&lookup);
        cfg.validate()?;
        Ok(cfg)
    }

    /// 環境変数で設定を上書きする
    fn apply_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty("SLACK_BOT_TOKEN") {
            self.slack.bot_token = token.trim().to_string();
        }
        if let Some(base_url) = non_empty("SLACK_API_BASE_URL") {
            self.slack.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(timeout) = non_empty("SLACK_TIMEOUT_SECS") {
            match timeout.trim().parse() {
                Ok(secs) => self.slack.timeout_secs = secs,
                Err(_) => tracing::warn!(value = %timeout, "Ignoring invalid SLACK_TIMEOUT_SECS"),
            }
        }
        if let Some(name) = non_empty("SLACK_MCP_SERVER_NAME") {
            self.server.name = name;
        }
        if let Some(level) = non_empty("SLACK_MCP_LOG_LEVEL") {
            self.server.log_level = level;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.slack.bot_token.is_empty() {
            return Err(Error::Config("SLACK_BOT_TOKEN not set".to_string()));
        }
        if self.slack.timeout_secs == 0 {
            return Err(Error::Config("slack.timeout_secs must be greater than 0".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// TOML 構造体定義（ファイル解析用）
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    slack: Option<TomlSlackConfig>,
    server: Option<TomlServerConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlSlackConfig {
    #[serde(default)]
    bot_token: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlServerConfig {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    log_level: Option<String>,
}
