use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Branch every execution request is pinned to.
pub const MAIN_BRANCH: &str = "refs/heads/main";

/// Request kind stamped on execution requests and echoed back on their results.
/// Also the Slack `event_type` carried by command output messages.
pub const COMPOSE_EVENT_TYPE: &str = "slack-compose";

/// Slack `event_type` carried by the project selection prompt.
pub const DIALOG_EVENT_TYPE: &str = "slack-compose-dialog";

/// Slash command relayed from Slack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlashCommand {
    pub command: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub channel_name: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
}

/// `reaction_added` event envelope relayed from the Slack Events API.
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionEnvelope {
    pub event: ReactionEvent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReactionEvent {
    pub reaction: String,
    pub item: ReactionItem,
    #[serde(default)]
    pub user: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReactionItem {
    pub channel: String,
    pub ts: String,
}

/// Request appended to the Poppit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    #[serde(rename = "repo")]
    pub project: String,
    pub branch: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dir: String,
    pub commands: Vec<String>,
    pub metadata: CorrelationMetadata,
}

/// Context threaded through Poppit and echoed back on the matching result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationMetadata {
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl CorrelationMetadata {
    #[must_use]
    pub fn for_project(project: &str) -> Self {
        Self {
            project: project.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn threaded(project: &str, channel: &str, thread_ts: &str) -> Self {
        Self {
            project: project.to_string(),
            thread_ts: Some(thread_ts.to_string()),
            channel: Some(channel.to_string()),
        }
    }
}

/// Command output published by Poppit.
///
/// `metadata` stays an open map: Poppit echoes whatever the request carried, and
/// other producers on the same channel may not follow our shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionResult {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl ExecutionResult {
    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.metadata_str("project")
    }

    #[must_use]
    pub fn thread_ts(&self) -> Option<&str> {
        self.metadata_str("thread_ts")
    }

    #[must_use]
    pub fn channel(&self) -> Option<&str> {
        self.metadata_str("channel")
    }
}

/// Slack message metadata (`event_type` + `event_payload`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub event_payload: Map<String, Value>,
}

impl MessageMetadata {
    #[must_use]
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            event_payload: Map::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.event_payload.insert(key.to_string(), value.into());
        self
    }

    /// The non-empty `project` string from the payload, if any.
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.event_payload
            .get("project")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Message appended to the SlackLiner list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    pub channel: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Value>,
    pub metadata: MessageMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
}
