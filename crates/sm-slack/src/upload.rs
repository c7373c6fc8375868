//! External file upload
//!
//! Slack's upload flow has three steps: reserve an upload URL, push the
//! bytes to it, then complete the upload against the target channels.
//! Any step failing aborts the whole upload.

use reqwest::multipart::{Form, Part};
use serde_json::json;
use tracing::{debug, info};

use crate::api::{SlackApiClient, take_field, take_list};
use crate::error::{Result, SlackError};
use crate::types::{UploadRequest, UploadedFile};

/// Whether a target looks like a conversation or user ID rather than a
/// channel name. Slack IDs are upper-case alphanumerics; names never are.
fn looks_like_id(target: &str) -> bool {
    let mut chars = target.chars();
    matches!(chars.next(), Some('C' | 'G' | 'D' | 'U' | 'W'))
        && target.len() >= 9
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

impl SlackApiClient {
    /// Upload a local file to one or more channels
    pub async fn upload_file(&self, request: &UploadRequest) -> Result<UploadedFile> {
        let path = &request.file_path;

        let size = match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => metadata.len(),
            _ => return Err(SlackError::FileNotFound(path.clone())),
        };
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let targets = self.resolve_targets(&request.channels).await?;

        debug!(file = %file_name, size, ?targets, "Requesting upload URL");
        let mut ticket = self
            .get(
                "files.getUploadURLExternal",
                &[("filename", file_name.clone()), ("length", size.to_string())],
            )
            .await?;
        let upload_url: String = take_field(&mut ticket, "files.getUploadURLExternal", "/upload_url")?;
        let file_id: String = take_field(&mut ticket, "files.getUploadURLExternal", "/file_id")?;

        debug!(file_id = %file_id, "Sending file contents");
        let bytes = tokio::fs::read(path).await?;
        let part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str("application/octet-stream")?;
        let response = self
            .upload_client
            .post(&upload_url)
            .multipart(Form::new().part("file", part))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SlackError::UploadRejected {
                status: response.status().as_u16(),
            });
        }

        let title = request.title.clone().unwrap_or_else(|| file_name.clone());
        let mut body = json!({
            "files": [{ "id": file_id, "title": title }],
        });
        match targets.as_slice() {
            [single] => body["channel_id"] = json!(single),
            many => body["channels"] = json!(many.join(",")),
        }
        if let Some(comment) = &request.initial_comment {
            body["initial_comment"] = json!(comment);
        }

        let mut done = self.post("files.completeUploadExternal", &body).await?;
        let files: Vec<UploadedFile> = take_list(&mut done, "files.completeUploadExternal", "/files")?;

        let mut file = files.into_iter().next().unwrap_or(UploadedFile {
            id: file_id,
            name: None,
            title: Some(title),
            size: None,
        });
        file.name.get_or_insert(file_name);
        file.size.get_or_insert(size);

        info!(file_id = %file.id, channels = %targets.join(","), "File uploaded");
        Ok(file)
    }

    /// Turn upload targets into conversation IDs.
    ///
    /// Names (with or without `#`) are looked up with a single
    /// `conversations.list` call.
    async fn resolve_targets(&self, targets: &[String]) -> Result<Vec<String>> {
        let targets: Vec<&str> = targets
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if targets.is_empty() {
            return Err(SlackError::ChannelNotFound("no target channel given".to_string()));
        }

        if targets.iter().all(|t| looks_like_id(t)) {
            return Ok(targets.into_iter().map(str::to_string).collect());
        }

        let channels = self.list_channels(true).await?;
        targets
            .into_iter()
            .map(|target| {
                if looks_like_id(target) {
                    return Ok(target.to_string());
                }
                let name = target.strip_prefix('#').unwrap_or(target);
                channels
                    .iter()
                    .find(|c| c.name == name)
                    .map(|c| c.id.clone())
                    .ok_or_else(|| SlackError::ChannelNotFound(name.to_string()))
            })
            .collect()
    }
}
