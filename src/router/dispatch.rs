use tracing::info;

use super::EventRouter;
use crate::core::models::{
    COMPOSE_EVENT_TYPE, ChatMessageRequest, CorrelationMetadata, ExecutionRequest, MAIN_BRANCH,
};
use crate::core::projects::Project;
use crate::errors::ComposeError;

impl EventRouter {
    /// Append one execution request for `project` to the Poppit list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the push to the bus fails.
    pub async fn dispatch_execution(
        &self,
        project: &Project,
        commands: Vec<String>,
        metadata: CorrelationMetadata,
    ) -> Result<(), ComposeError> {
        let request = ExecutionRequest {
            project: project.name.clone(),
            branch: MAIN_BRANCH.to_string(),
            kind: COMPOSE_EVENT_TYPE.to_string(),
            dir: project.working_dir.clone(),
            commands,
            metadata,
        };

        let body = serde_json::to_string(&request).map_err(|e| {
            ComposeError::BusError(format!("Failed to serialize execution request: {e}"))
        })?;
        self.bus.push(&self.config.poppit_list_name, &body).await?;

        info!(
            project = %request.project,
            commands = ?request.commands,
            "Sent execution request to Poppit"
        );
        Ok(())
    }

    /// Append one chat message to the SlackLiner list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the push to the bus fails.
    pub async fn dispatch_chat_message(
        &self,
        message: &ChatMessageRequest,
    ) -> Result<(), ComposeError> {
        let body = serde_json::to_string(message)
            .map_err(|e| ComposeError::BusError(format!("Failed to serialize chat message: {e}")))?;
        self.bus
            .push(&self.config.slackliner_list_name, &body)
            .await?;

        info!(
            channel = %message.channel,
            event_type = %message.metadata.event_type,
            threaded = message.thread_ts.is_some(),
            "Sent message to SlackLiner"
        );
        Ok(())
    }
}
