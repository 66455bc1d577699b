//! Handler for `block_actions` payloads from the project selection prompt.

use serde_json::Value;
use tracing::{debug, error, warn};

use super::EventRouter;
use super::parsing::{decode, v_array, v_str};
use crate::core::commands::action_for_button;
use crate::core::models::CorrelationMetadata;
use crate::errors::ComposeError;
use crate::slack::prompt_builder::{PROJECT_SELECT_ACTION_ID, PROJECT_SELECT_BLOCK_ID};

impl EventRouter {
    /// Dispatch one execution request per recognised button in the batch.
    /// A failed dispatch is logged and the remaining actions still run.
    ///
    /// # Errors
    ///
    /// Returns an error only if the payload is not valid JSON.
    pub async fn handle_block_actions(&self, payload: &str) -> Result<(), ComposeError> {
        let payload: Value = decode(payload, "block actions")?;

        if let Some(kind) = v_str(&payload, &["type"])
            && kind != "block_actions"
        {
            debug!(kind = %kind, "Ignoring interactive payload");
            return Ok(());
        }

        let Some(project_name) = v_str(
            &payload,
            &[
                "state",
                "values",
                PROJECT_SELECT_BLOCK_ID,
                PROJECT_SELECT_ACTION_ID,
                "selected_option",
                "value",
            ],
        )
        .filter(|name| !name.is_empty()) else {
            debug!("Block action without a selected project");
            return Ok(());
        };

        let Some(project) = self.projects.get(project_name) else {
            warn!(project = %project_name, "Unknown project selected");
            return Ok(());
        };

        let channel = v_str(&payload, &["channel", "id"])
            .or_else(|| v_str(&payload, &["container", "channel_id"]))
            .unwrap_or("");
        let thread_ts = v_str(&payload, &["message", "ts"])
            .or_else(|| v_str(&payload, &["container", "message_ts"]))
            .unwrap_or("");

        if channel.is_empty() || thread_ts.is_empty() {
            warn!(project = %project.name, "Block action has no originating message to thread under");
            return Ok(());
        }

        let actions = v_array(&payload, &["actions"]).map(Vec::as_slice).unwrap_or_default();
        for action in actions {
            if v_str(action, &["type"]) != Some("button") {
                continue;
            }

            let action_id = v_str(action, &["action_id"]).unwrap_or("");
            let Some(compose_action) = action_for_button(action_id) else {
                debug!(action_id = %action_id, "Skipping unknown action");
                continue;
            };

            let command = self.expander.expand(compose_action);
            if let Err(e) = self
                .dispatch_execution(
                    project,
                    vec![command],
                    CorrelationMetadata::threaded(&project.name, channel, thread_ts),
                )
                .await
            {
                error!(
                    project = %project.name,
                    action_id = %action_id,
                    "Failed to dispatch action: {}", e
                );
            }
        }

        Ok(())
    }
}
