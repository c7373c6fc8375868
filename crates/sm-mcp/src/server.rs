//! MCP server exposing the Slack tools over stdio
//!
//! Each `#[tool]` method is a thin wrapper: it unpacks the parameter struct
//! and delegates to [`SlackTools`]. All rendering lives there.

use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::format::render_unexpected;
use crate::tools::{DEFAULT_HISTORY_LIMIT, DEFAULT_SEARCH_COUNT, DEFAULT_USER_LIMIT, SlackTools};

const INSTRUCTIONS: &str = "Tools for a Slack workspace: send messages and direct messages, \
read channel history and threads, search messages, list channels and users, \
upload files and add reactions. Message timestamps (ts) returned by the read \
tools are the handles for reactions and thread replies.";

// ============================================================================
// Tool parameters
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SendMessageParams {
    /// Channel ID or name, e.g. "#general" or "C1234567890"
    pub channel: String,
    /// Message text
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChannelHistoryParams {
    /// Channel ID, e.g. "C1234567890"
    pub channel_id: String,
    /// Number of messages to fetch (1-100, default 10)
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DirectMessageParams {
    /// Recipient user ID, e.g. "U1234567890"
    pub user_id: String,
    /// Message text
    pub text: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UsersParams {
    /// Maximum number of users (1-1000, default 50)
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchParams {
    /// Slack search query, passed through unchanged
    pub query: String,
    /// Number of results (1-100, default 20)
    #[serde(default)]
    pub count: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UploadFileParams {
    /// Comma-separated channel IDs or names
    pub channels: String,
    /// Path of the local file to upload
    pub file_path: String,
    /// File title; defaults to the file name
    #[serde(default)]
    pub title: Option<String>,
    /// Message posted along with the file
    #[serde(default)]
    pub initial_comment: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReactionParams {
    /// Channel ID containing the message
    pub channel: String,
    /// Message timestamp (ts)
    pub timestamp: String,
    /// Emoji name, with or without colons, e.g. "thumbsup"
    pub emoji: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ThreadParams {
    /// Channel ID containing the thread
    pub channel: String,
    /// Timestamp of the thread's parent message
    pub thread_ts: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ThreadReplyParams {
    /// Channel ID containing the thread
    pub channel: String,
    /// Timestamp of the thread's parent message
    pub thread_ts: String,
    /// Reply text
    pub text: String,
}

// ============================================================================
// Server
// ============================================================================

#[derive(Clone)]
pub struct SlackMcpServer {
    tools: SlackTools,
    name: String,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SlackMcpServer {
    pub fn new(tools: SlackTools, name: impl Into<String>) -> Self {
        Self {
            tools,
            name: name.into(),
            tool_router: Self::tool_router(),
        }
    }

    /// Serve on stdin/stdout until the peer disconnects
    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        info!(name = %self.name, "Serving MCP over stdio");

        let service = self.serve(rmcp::transport::stdio()).await?;
        let reason = service.waiting().await?;

        info!(?reason, "MCP session ended");
        Ok(())
    }

    #[tool(description = "Send a message to a Slack channel")]
    async fn send_slack_message(
        &self,
        Parameters(params): Parameters<SendMessageParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.send_message(&params.channel, &params.text)).await
    }

    #[tool(description = "List the Slack channels the bot can access")]
    async fn get_slack_channels(&self) -> Result<CallToolResult, McpError> {
        respond(self.tools.list_channels()).await
    }

    #[tool(description = "Get recent messages from a Slack channel, oldest first")]
    async fn get_slack_channel_history(
        &self,
        Parameters(params): Parameters<ChannelHistoryParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.channel_history(
            &params.channel_id,
            params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        )).await
    }

    #[tool(description = "Send a direct message to a Slack user")]
    async fn send_slack_direct_message(
        &self,
        Parameters(params): Parameters<DirectMessageParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.send_direct_message(&params.user_id, &params.text)).await
    }

    #[tool(description = "List workspace users, grouped into members and bots")]
    async fn get_slack_users(
        &self,
        Parameters(params): Parameters<UsersParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.tools
                .list_users(params.limit.unwrap_or(DEFAULT_USER_LIMIT)),
        )
        .await
    }

    #[tool(description = "Search Slack messages across the workspace")]
    async fn search_slack_messages(
        &self,
        Parameters(params): Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.search_messages(
            &params.query,
            params.count.unwrap_or(DEFAULT_SEARCH_COUNT),
        )).await
    }

    #[tool(description = "Upload a local file to one or more Slack channels")]
    async fn upload_slack_file(
        &self,
        Parameters(params): Parameters<UploadFileParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.upload_file(
            &params.channels,
            &params.file_path,
            params.title.as_deref(),
            params.initial_comment.as_deref(),
        ))
        .await
    }

    #[tool(description = "Add an emoji reaction to a Slack message")]
    async fn add_slack_reaction(
        &self,
        Parameters(params): Parameters<ReactionParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.tools
                .add_reaction(&params.channel, &params.timestamp, &params.emoji),
        )
        .await
    }

    #[tool(description = "Get the replies in a Slack thread")]
    async fn get_slack_thread_replies(
        &self,
        Parameters(params): Parameters<ThreadParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(self.tools.thread_replies(&params.channel, &params.thread_ts)).await
    }

    #[tool(description = "Reply in a Slack thread")]
    async fn send_slack_thread_reply(
        &self,
        Parameters(params): Parameters<ThreadReplyParams>,
    ) -> Result<CallToolResult, McpError> {
        respond(
            self.tools
                .send_thread_reply(&params.channel, &params.thread_ts, &params.text),
        )
        .await
    }

    #[tool(description = "Check the Slack connection and bot identity")]
    async fn test_slack_connection(&self) -> Result<CallToolResult, McpError> {
        respond(self.tools.test_connection()).await
    }
}

#[tool_handler]
impl ServerHandler for SlackMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

/// Run a tool body, turning a panic into failure text
async fn guarded(body: impl Future<Output = String>) -> String {
    match AssertUnwindSafe(body).catch_unwind().await {
        Ok(text) => text,
        Err(panic) => {
            let description = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "tool panicked".to_string());
            error!(panic = %description, "Tool panicked");
            render_unexpected(&description)
        }
    }
}

async fn respond(body: impl Future<Output = String>) -> Result<CallToolResult, McpError> {
    let text = guarded(body).await;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
