//! Slack tool procedures
//!
//! One method per MCP tool. Every method returns a `String`: a confirmation
//! on success, or a failure text produced by [`crate::format::render_failure`] otherwise.

use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, info};

use sm_slack::api::{HISTORY_LIMIT_MAX, SEARCH_COUNT_MAX, USER_LIST_LIMIT_MAX};
use sm_slack::{
    HistoryQuery, SearchSort, SlackApiClient, SlackChannel, SlackUser, UploadRequest, sort_by_ts,
};

use crate::format::{
    clamp_count, format_channel_list, format_message_list, format_timestamp, format_user_list,
    render,
};

pub const DEFAULT_HISTORY_LIMIT: i64 = 10;
pub const DEFAULT_USER_LIMIT: i64 = 50;
pub const DEFAULT_SEARCH_COUNT: i64 = 20;

/// Slack operations rendered as tool output
#[derive(Clone)]
pub struct SlackTools {
    client: SlackApiClient,
}

impl SlackTools {
    pub fn new(client: SlackApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SlackApiClient {
        &self.client
    }

    pub async fn send_message(&self, channel: &str, text: &str) -> String {
        render(
            self.client.send_message(channel, text, None).await,
            "Sending message",
            &[("Channel", channel), ("Message", text)],
            |sent| {
                format!(
                    "✅ Message sent successfully!\nChannel: {}\nMessage: {}\nTimestamp: {}",
                    channel,
                    text,
                    format_timestamp(&sent.ts)
                )
            },
        )
    }

    pub async fn list_channels(&self) -> String {
        render(
            self.client.list_channels(true).await,
            "Listing channels",
            &[],
            |channels| {
                if channels.is_empty() {
                    return "No accessible channels found.".to_string();
                }

                let (private, public): (Vec<&SlackChannel>, Vec<&SlackChannel>) =
                    channels.iter().partition(|c| c.is_private);

                let mut text = format!("📋 Found {} channels.", channels.len());
                if !public.is_empty() {
                    text.push_str(&format!(
                        "\n\n🌐 Public channels ({}):\n{}",
                        public.len(),
                        format_channel_list(&public)
                    ));
                }
                if !private.is_empty() {
                    text.push_str(&format!(
                        "\n\n🔒 Private channels ({}):\n{}",
                        private.len(),
                        format_channel_list(&private)
                    ));
                }
                text
            },
        )
    }

    pub async fn channel_history(&self, channel_id: &str, limit: i64) -> String {
        let limit = clamp_count(limit, HISTORY_LIMIT_MAX);
        let query = HistoryQuery::new(channel_id, limit);
        let limit_text = limit.to_string();

        render(
            self.client.channel_history(&query).await,
            "Reading channel history",
            &[("Channel", channel_id), ("Limit", &limit_text)],
            |mut messages| {
                if messages.is_empty() {
                    return format!("No messages in channel {}.", channel_id);
                }

                sort_by_ts(&mut messages);
                format!(
                    "📜 Last {} messages in channel {}:\n\n{}",
                    messages.len(),
                    channel_id,
                    format_message_list(&messages)
                )
            },
        )
    }

    pub async fn send_direct_message(&self, user_id: &str, text: &str) -> String {
        let result = match self.client.send_direct_message(user_id, text).await {
            Ok(sent) => Ok((sent, self.recipient_name(user_id).await)),
            Err(e) => Err(e),
        };

        render(
            result,
            "Sending direct message",
            &[("User ID", user_id), ("Message", text)],
            |(sent, recipient)| {
                format!(
                    "✅ Direct message sent successfully!\nRecipient: {}\nMessage: {}\nTimestamp: {}",
                    recipient,
                    text,
                    format_timestamp(&sent.ts)
                )
            },
        )
    }

    /// Display name for a DM recipient; falls back to the raw ID
    async fn recipient_name(&self, user_id: &str) -> String {
        match self.client.user_info(user_id).await {
            Ok(user) => user.display(),
            Err(e) => {
                debug!(user_id, error = %e, "Recipient lookup failed");
                user_id.to_string()
            }
        }
    }

    pub async fn list_users(&self, limit: i64) -> String {
        let limit = clamp_count(limit, USER_LIST_LIMIT_MAX);
        let limit_text = limit.to_string();

        render(
            self.client.list_users(limit).await,
            "Listing users",
            &[("Limit", &limit_text)],
            |users| {
                if users.is_empty() {
                    return "No users found.".to_string();
                }

                let (bots, members): (Vec<&SlackUser>, Vec<&SlackUser>) =
                    users.iter().partition(|u| u.is_bot);

                let mut text = format!("👥 Found {} users.", users.len());
                if !members.is_empty() {
                    text.push_str(&format!(
                        "\n\n👤 Members ({}):\n{}",
                        members.len(),
                        format_user_list(&members)
                    ));
                }
                if !bots.is_empty() {
                    text.push_str(&format!(
                        "\n\n🤖 Bots ({}):\n{}",
                        bots.len(),
                        format_user_list(&bots)
                    ));
                }
                text
            },
        )
    }

    pub async fn search_messages(&self, query: &str, count: i64) -> String {
        let count = clamp_count(count, SEARCH_COUNT_MAX);
        let count_text = count.to_string();

        render(
            self.client
                .search_messages(query, count, SearchSort::Timestamp)
                .await,
            "Searching messages",
            &[("Query", query), ("Count", &count_text)],
            |matches| {
                if matches.is_empty() {
                    return format!("No messages found for '{}'.", query);
                }

                let results = matches
                    .iter()
                    .enumerate()
                    .map(|(i, m)| {
                        format!(
                            "{}. [{}] #{} - @{}:\n   {}",
                            i + 1,
                            format_timestamp(&m.ts),
                            m.channel.name.as_deref().unwrap_or("unknown"),
                            m.author(),
                            m.text
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n");

                format!(
                    "🔍 Search results for '{}' ({}):\n\n{}",
                    query,
                    matches.len(),
                    results
                )
            },
        )
    }

    pub async fn upload_file(
        &self,
        channels: &str,
        file_path: &str,
        title: Option<&str>,
        initial_comment: Option<&str>,
    ) -> String {
        let request = UploadRequest {
            channels: channels
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            file_path: PathBuf::from(file_path),
            title: title.map(str::to_string),
            initial_comment: initial_comment.map(str::to_string),
        };

        render(
            self.client.upload_file(&request).await,
            "Uploading file",
            &[("File", file_path), ("Channels", channels)],
            |file| {
                info!(file_id = %file.id, "Upload tool finished");
                format!(
                    "✅ File uploaded successfully!\nFile: {}\nSize: {} bytes\nChannels: {}\nTitle: {}\nComment: {}",
                    file.name.as_deref().unwrap_or(file_path),
                    file.size.unwrap_or_default(),
                    channels,
                    file.title.as_deref().unwrap_or("none"),
                    initial_comment.unwrap_or("none")
                )
            },
        )
    }

    pub async fn add_reaction(&self, channel: &str, timestamp: &str, emoji: &str) -> String {
        let name = emoji.trim_matches(':');

        render(
            self.client.add_reaction(channel, timestamp, name).await,
            "Adding reaction",
            &[("Channel", channel), ("Timestamp", timestamp), ("Emoji", emoji)],
            |()| {
                format!(
                    "✅ Reaction added!\nChannel: {}\nMessage time: {}\nEmoji: :{}:",
                    channel,
                    format_timestamp(timestamp),
                    name
                )
            },
        )
    }

    pub async fn thread_replies(&self, channel: &str, thread_ts: &str) -> String {
        render(
            self.client.thread_replies(channel, thread_ts).await,
            "Reading thread replies",
            &[("Channel", channel), ("Thread", thread_ts)],
            |messages| {
                if messages.is_empty() {
                    return format!(
                        "No messages in thread.\nChannel: {}\nThread: {}",
                        channel,
                        format_timestamp(thread_ts)
                    );
                }

                // the parent message is always first
                let replies = &messages[1..];
                let body = if replies.is_empty() {
                    "No replies yet.".to_string()
                } else {
                    format_message_list(replies)
                };

                format!(
                    "🧵 Thread replies ({}):\nParent message time: {}\n\n{}",
                    replies.len(),
                    format_timestamp(thread_ts),
                    body
                )
            },
        )
    }

    pub async fn send_thread_reply(&self, channel: &str, thread_ts: &str, text: &str) -> String {
        render(
            self.client.send_message(channel, text, Some(thread_ts)).await,
            "Sending thread reply",
            &[("Channel", channel), ("Thread", thread_ts), ("Reply", text)],
            |sent| {
                format!(
                    "✅ Thread reply sent!\nChannel: {}\nParent message: {}\nReply: {}\nReply time: {}",
                    channel,
                    format_timestamp(thread_ts),
                    text,
                    format_timestamp(&sent.ts)
                )
            },
        )
    }

    pub async fn test_connection(&self) -> String {
        render(
            self.client.auth_test().await,
            "Slack connection test",
            &[("Hint", "check SLACK_BOT_TOKEN")],
            |auth| {
                format!(
                    "✅ Connected to Slack!\nTeam: {} (ID: {})\nBot user: {} (ID: {})\nChecked at: {}",
                    auth.team,
                    auth.team_id,
                    auth.user,
                    auth.user_id,
                    Local::now().format("%Y-%m-%d %H:%M:%S")
                )
            },
        )
    }
}
