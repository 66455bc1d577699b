//! Handler for emoji reactions on posted command output.
//!
//! The reacted-to message's Slack metadata is the only link back to a project,
//! so every recognised reaction costs one metadata lookup.

use tracing::{debug, info, warn};

use super::EventRouter;
use super::parsing::decode;
use crate::core::commands::action_for_reaction;
use crate::core::models::{COMPOSE_EVENT_TYPE, CorrelationMetadata, ReactionEnvelope};
use crate::errors::ComposeError;

impl EventRouter {
    /// # Errors
    ///
    /// Returns an error if the payload cannot be decoded, the metadata lookup
    /// fails, or the dispatch fails.
    pub async fn handle_reaction(&self, payload: &str) -> Result<(), ComposeError> {
        let ReactionEnvelope { event } = decode(payload, "reaction")?;

        let Some(action) = action_for_reaction(&event.reaction) else {
            debug!(reaction = %event.reaction, "Ignoring unmapped reaction");
            return Ok(());
        };

        info!(
            reaction = %event.reaction,
            action = action.label(),
            user = %event.user,
            channel = %event.item.channel,
            ts = %event.item.ts,
            "Received compose reaction"
        );

        let metadata = self
            .metadata
            .message_metadata(&event.item.channel, &event.item.ts)
            .await?;

        if metadata.event_type != COMPOSE_EVENT_TYPE {
            debug!(event_type = %metadata.event_type, "Reacted message is not a slack-compose message");
            return Ok(());
        }

        let Some(project_name) = metadata.project() else {
            warn!(ts = %event.item.ts, "Reacted message has no project in its metadata");
            return Ok(());
        };

        let Some(project) = self.projects.get(project_name) else {
            warn!(project = %project_name, "Unknown project in message metadata");
            return Ok(());
        };

        let command = self.expander.expand(action);
        self.dispatch_execution(
            project,
            vec![command],
            CorrelationMetadata::threaded(&project.name, &event.item.channel, &event.item.ts),
        )
        .await
    }
}
