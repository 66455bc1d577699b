//! Builders for the chat messages handed to SlackLiner.

use crate::core::models::{
    COMPOSE_EVENT_TYPE, ChatMessageRequest, DIALOG_EVENT_TYPE, ExecutionResult, MessageMetadata,
};
use crate::core::projects::ProjectRegistry;

use super::prompt_builder::{build_project_prompt, prompt_fallback_text};

/// How long SlackLiner keeps command output messages around.
pub const OUTPUT_TTL_SECONDS: u64 = 86_400;

/// Wraps command output in a fenced code block. Backtick runs inside the
/// output are split with zero-width spaces so they cannot close the fence.
#[must_use]
pub fn format_command_output(output: &str) -> String {
    let escaped = output.replace("```", "`\u{200b}`\u{200b}`");
    format!("```\n{escaped}\n```")
}

/// Message posting a command's output, threaded when the result carries a
/// thread anchor. Falls back to `default_channel` without channel metadata.
#[must_use]
pub fn command_output_message(result: &ExecutionResult, default_channel: &str) -> ChatMessageRequest {
    let mut metadata =
        MessageMetadata::new(COMPOSE_EVENT_TYPE).with("command", result.command.as_str());
    if let Some(project) = result.project() {
        metadata = metadata.with("project", project);
    }

    ChatMessageRequest {
        channel: result.channel().unwrap_or(default_channel).to_string(),
        text: Some(format_command_output(&result.output)),
        blocks: None,
        metadata,
        ttl: Some(OUTPUT_TTL_SECONDS),
        thread_ts: result.thread_ts().map(str::to_string),
    }
}

/// Message carrying the project selection prompt.
#[must_use]
pub fn project_prompt_message(
    channel: &str,
    projects: &ProjectRegistry,
    requested: Option<&str>,
) -> ChatMessageRequest {
    let mut metadata = MessageMetadata::new(DIALOG_EVENT_TYPE);
    if let Some(name) = requested {
        metadata = metadata.with("requested", name);
    }

    ChatMessageRequest {
        channel: channel.to_string(),
        text: Some(prompt_fallback_text(requested)),
        blocks: Some(build_project_prompt(projects, requested)),
        metadata,
        ttl: None,
        thread_ts: None,
    }
}
