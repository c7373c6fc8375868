//! sm-mcp: Slack tools over the Model Context Protocol
//!
//! Slack API クライアントの各操作を、文字列を返す MCP ツールとして公開します。
//! ツールは失敗してもエラーを伝播させず、常に読みやすいテキストを返します。

pub mod format;
pub mod server;
pub mod tools;

pub use server::SlackMcpServer;
pub use tools::SlackTools;
