//! Event router: one decode → validate → correlate → dispatch pipeline per
//! inbound channel.
//!
//! The router keeps no per-request state. Everything needed to route a result
//! back to its project and thread travels inside the messages themselves.

pub mod dispatch;
pub mod interactive_handler;
pub mod listener;
pub mod output_handler;
pub mod parsing;
pub mod reaction_handler;
pub mod slash_handler;

use std::fmt;
use std::sync::Arc;

use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use crate::bus::EventBus;
use crate::core::commands::CommandExpander;
use crate::core::config::AppConfig;
use crate::core::projects::ProjectRegistry;
use crate::errors::ComposeError;
use crate::slack::MetadataResolver;

pub use listener::{Listeners, SHUTDOWN_GRACE};

/// Inbound channel kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    SlashCommand,
    Reaction,
    BlockAction,
    CommandOutput,
}

impl Route {
    pub const ALL: [Route; 4] = [
        Route::SlashCommand,
        Route::Reaction,
        Route::CommandOutput,
        Route::BlockAction,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Route::SlashCommand => "slash_command",
            Route::Reaction => "reaction",
            Route::BlockAction => "block_action",
            Route::CommandOutput => "command_output",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub struct EventRouter {
    config: Arc<AppConfig>,
    projects: Arc<ProjectRegistry>,
    bus: Arc<dyn EventBus>,
    metadata: Arc<dyn MetadataResolver>,
    expander: CommandExpander,
}

impl EventRouter {
    #[must_use]
    pub fn new(
        config: Arc<AppConfig>,
        projects: Arc<ProjectRegistry>,
        bus: Arc<dyn EventBus>,
        metadata: Arc<dyn MetadataResolver>,
    ) -> Self {
        let expander = CommandExpander::new(config.log_line_limit);
        Self {
            config,
            projects,
            bus,
            metadata,
            expander,
        }
    }

    /// Bus channel the given route listens on.
    #[must_use]
    pub fn channel_for(&self, route: Route) -> &str {
        match route {
            Route::SlashCommand => &self.config.slack_command_channel,
            Route::Reaction => &self.config.slack_reaction_channel,
            Route::BlockAction => &self.config.slack_block_actions_channel,
            Route::CommandOutput => &self.config.poppit_output_channel,
        }
    }

    /// Process one inbound payload to completion. Failures are logged against
    /// a fresh `event_id` and never propagated: the event is simply dropped.
    pub async fn route(&self, route: Route, payload: &str) {
        let event_id = Uuid::new_v4();
        let span = info_span!("event", route = %route, event_id = %event_id);

        async {
            let result = match route {
                Route::SlashCommand => self.handle_slash_command(payload).await,
                Route::Reaction => self.handle_reaction(payload).await,
                Route::BlockAction => self.handle_block_actions(payload).await,
                Route::CommandOutput => self.handle_command_output(payload).await,
            };

            match result {
                Ok(()) => {}
                // correlation could not be resolved, nothing is broken
                Err(e @ ComposeError::NotFound(_)) => {
                    warn!("Dropping {} event: {}", route, e);
                }
                Err(e) => error!("Dropping {} event: {}", route, e),
            }
        }
        .instrument(span)
        .await;
    }
}
