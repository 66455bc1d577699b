//! Slack Web API client
//!
//! Only the read path the router needs: fetching a posted message's metadata.
//! Outbound messages go through SlackLiner, never directly to Slack.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use slack_morphism::{SlackApiToken, SlackApiTokenValue};
use tracing::debug;

use super::metadata::MetadataResolver;
use crate::core::models::MessageMetadata;
use crate::errors::ComposeError;

const SLACK_API_BASE: &str = "https://slack.com/api";

static HTTP_CLIENT: std::sync::LazyLock<Client> = std::sync::LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Shared shape of `conversations.history` and `conversations.replies`.
#[derive(Debug, Deserialize)]
struct ConversationMessagesResponse {
    ok: bool,
    #[serde(default)]
    messages: Vec<ConversationMessage>,
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ConversationMessage {
    #[serde(default)]
    ts: String,
    #[serde(default)]
    metadata: Option<MessageMetadata>,
}

fn find_message(messages: Vec<ConversationMessage>, ts: &str) -> Option<ConversationMessage> {
    messages.into_iter().find(|m| m.ts == ts)
}

pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    async fn conversation_messages(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<ConversationMessage>, ComposeError> {
        let resp = HTTP_CLIENT
            .get(format!("{SLACK_API_BASE}/{method}"))
            .bearer_auth(&self.token.token_value.0)
            .query(query)
            .send()
            .await
            .map_err(|e| ComposeError::HttpError(format!("{method} HTTP: {e}")))?;

        if !resp.status().is_success() {
            return Err(ComposeError::ApiError(format!(
                "{method} HTTP {}",
                resp.status()
            )));
        }

        let body: ConversationMessagesResponse = resp
            .json()
            .await
            .map_err(|e| ComposeError::ApiError(format!("{method} parse: {e}")))?;

        if !body.ok {
            return Err(ComposeError::ApiError(format!(
                "{method} error: {}",
                body.error.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(body.messages)
    }

    /// Fetch the message at `(channel, ts)` including its metadata.
    ///
    /// `conversations.history` only sees top-level messages, so a miss there is
    /// retried once against `conversations.replies` for thread replies.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if neither lookup returns a message with exactly `ts`.
    pub async fn get_message_metadata(
        &self,
        channel: &str,
        ts: &str,
    ) -> Result<MessageMetadata, ComposeError> {
        let history = self
            .conversation_messages(
                "conversations.history",
                &[
                    ("channel", channel),
                    ("latest", ts),
                    ("inclusive", "true"),
                    ("limit", "1"),
                    ("include_all_metadata", "true"),
                ],
            )
            .await?;

        let message = match find_message(history, ts) {
            Some(message) => message,
            None => {
                debug!(channel = %channel, ts = %ts, "Message not in history, checking thread replies");
                let replies = self
                    .conversation_messages(
                        "conversations.replies",
                        &[
                            ("channel", channel),
                            ("ts", ts),
                            ("oldest", ts),
                            ("latest", ts),
                            ("inclusive", "true"),
                            ("include_all_metadata", "true"),
                        ],
                    )
                    .await?;
                find_message(replies, ts).ok_or_else(|| {
                    ComposeError::NotFound(format!("message {ts} in channel {channel}"))
                })?
            }
        };

        Ok(message.metadata.unwrap_or_default())
    }
}

#[async_trait]
impl MetadataResolver for SlackClient {
    async fn message_metadata(
        &self,
        channel: &str,
        ts: &str,
    ) -> Result<MessageMetadata, ComposeError> {
        self.get_message_metadata(channel, ts).await
    }
}
