//! Text rendering for tool results

use chrono::{DateTime, Local};
use tracing::warn;

use sm_slack::{SlackChannel, SlackError, SlackMessage, SlackUser};

/// Render a Slack timestamp ("1690000000.000100") as local time.
///
/// Unparseable input is returned unchanged.
pub fn format_timestamp(ts: &str) -> String {
    ts.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .and_then(|v| DateTime::from_timestamp(v.floor() as i64, 0))
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| ts.to_string())
}

/// Clamp a caller-supplied count into `[1, max]`
pub fn clamp_count(value: i64, max: u32) -> u32 {
    value.clamp(1, i64::from(max)) as u32
}

pub fn format_message_list(messages: &[SlackMessage]) -> String {
    if messages.is_empty() {
        return "No messages.".to_string();
    }

    messages
        .iter()
        .map(|msg| {
            let author = msg.user_name.as_deref().unwrap_or(&msg.user);
            let mut line = format!("[{}] {}: {}", format_timestamp(&msg.ts), author, msg.text);
            if msg.thread_ts.as_deref().is_some_and(|t| t != msg.ts) {
                line.push_str(" (thread reply)");
            }
            // raw ts is the handle for reactions and replies
            line.push_str(&format!("\n→ Timestamp: {}", msg.ts));
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_channel_list(channels: &[&SlackChannel]) -> String {
    if channels.is_empty() {
        return "No accessible channels.".to_string();
    }

    channels
        .iter()
        .map(|channel| {
            let privacy = if channel.is_private { "private" } else { "public" };
            let membership = if channel.is_member { "member" } else { "not a member" };

            let mut info = format!(
                "#{} (ID: {}) - {}, {}",
                channel.name, channel.id, privacy, membership
            );
            if let Some(topic) = &channel.topic {
                info.push_str(&format!("\n  Topic: {}", topic));
            }
            if let Some(purpose) = &channel.purpose {
                info.push_str(&format!("\n  Purpose: {}", purpose));
            }
            if let Some(members) = channel.num_members.filter(|n| *n > 0) {
                info.push_str(&format!("\n  Members: {}", members));
            }
            info
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_user_list(users: &[&SlackUser]) -> String {
    if users.is_empty() {
        return "No users.".to_string();
    }

    users
        .iter()
        .map(|user| {
            let mut info = format!("{} - ID: {}", user.display(), user.id);

            let mut details = Vec::new();
            if let Some(email) = &user.email {
                details.push(format!("Email: {}", email));
            }
            if user.is_bot {
                details.push("Bot".to_string());
            }
            if user.is_admin {
                details.push("Admin".to_string());
            }
            if let Some(status) = &user.status {
                details.push(format!("Status: {}", status));
            }
            if !details.is_empty() {
                info.push_str(&format!("\n  {}", details.join(", ")));
            }
            info
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Failure text shared by every tool.
///
/// Embeds the error (remediation text for permission problems, raw tag
/// plus payload for other API errors) and the call parameters.
pub fn render_failure(action: &str, error: &SlackError, context: &[(&str, &str)]) -> String {
    let mut text = format!("❌ {} failed: {}", action, error);

    for (label, value) in context {
        text.push_str(&format!("\n{}: {}", label, value));
    }
    if let Some(payload) = error.response() {
        text.push_str(&format!("\nDetails: {}", payload));
    }

    text
}

/// Failure text for faults outside the client's error taxonomy
pub fn render_unexpected(description: &str) -> String {
    format!("❌ Unexpected error: {}", description)
}

/// Collapse a client result into the tool's single string outcome
pub fn render<T>(
    result: sm_slack::Result<T>,
    action: &str,
    context: &[(&str, &str)],
    on_success: impl FnOnce(T) -> String,
) -> String {
    match result {
        Ok(value) => on_success(value),
        Err(e) => {
            warn!(action, error = %e, "Slack tool failed");
            render_failure(action, &e, context)
        }
    }
}
