use async_trait::async_trait;

use crate::core::models::MessageMetadata;
use crate::errors::ComposeError;

/// Looks up the structured metadata attached to a posted Slack message.
#[async_trait]
pub trait MetadataResolver: Send + Sync {
    /// Metadata of the message at `(channel, ts)`. A message without metadata
    /// yields an empty `event_type`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no message exists at `ts`, or an API/HTTP error
    /// when the lookup itself fails.
    async fn message_metadata(
        &self,
        channel: &str,
        ts: &str,
    ) -> Result<MessageMetadata, ComposeError>;
}
