//! Handler for Poppit command output.

use tracing::{debug, warn};

use super::EventRouter;
use super::parsing::decode;
use crate::core::models::{COMPOSE_EVENT_TYPE, ExecutionResult};
use crate::errors::ComposeError;
use crate::slack::response_builder::command_output_message;

impl EventRouter {
    /// Post one chat message per result. Results are not deduplicated.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be decoded or the dispatch fails.
    pub async fn handle_command_output(&self, payload: &str) -> Result<(), ComposeError> {
        let result: ExecutionResult = decode(payload, "command output")?;

        if result.kind != COMPOSE_EVENT_TYPE {
            debug!(kind = %result.kind, "Ignoring output for another request type");
            return Ok(());
        }

        if result.project().is_none() {
            warn!(
                command = %result.command,
                "Command output has no project in its metadata, posting without project context"
            );
        }

        let message = command_output_message(&result, &self.config.slack_channel);
        self.dispatch_chat_message(&message).await
    }
}
