//! Handler for relayed slash commands.
//!
//! `/slack-compose <project>` asks Poppit for the project's status. A missing
//! or unknown project falls back to the interactive selection prompt.

use tracing::{debug, info};

use super::EventRouter;
use super::parsing::decode;
use crate::core::commands::ComposeAction;
use crate::core::models::{CorrelationMetadata, SlashCommand};
use crate::errors::ComposeError;
use crate::slack::response_builder::project_prompt_message;

impl EventRouter {
    /// # Errors
    ///
    /// Returns an error if the payload cannot be decoded or the dispatch fails.
    pub async fn handle_slash_command(&self, payload: &str) -> Result<(), ComposeError> {
        let command: SlashCommand = decode(payload, "slash command")?;

        if command.command != self.config.slack_command_name {
            debug!(command = %command.command, "Ignoring unrelated slash command");
            return Ok(());
        }

        let project_name = command.text.trim();
        info!(
            user = %command.user_name,
            channel = %command.channel_id,
            text = %project_name,
            "Received {} command", command.command
        );

        if let Some(project) = self.projects.get(project_name).filter(|_| !project_name.is_empty())
        {
            let action = ComposeAction::Ps;
            info!(project = %project.name, action = action.label(), "Requesting project status");
            let commands = vec![self.expander.expand(action)];
            return self
                .dispatch_execution(
                    project,
                    commands,
                    CorrelationMetadata::for_project(&project.name),
                )
                .await;
        }

        let requested = (!project_name.is_empty()).then_some(project_name);
        match requested {
            Some(name) => info!(project = %name, "Unknown project, sending selection prompt"),
            None => info!("No project given, sending selection prompt"),
        }

        let channel = if command.channel_id.is_empty() {
            self.config.slack_channel.as_str()
        } else {
            command.channel_id.as_str()
        };
        let message = project_prompt_message(channel, &self.projects, requested);
        self.dispatch_chat_message(&message).await
    }
}
