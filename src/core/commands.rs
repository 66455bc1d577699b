//! Compose actions and their expansion into shell commands.
//!
//! Emoji reactions and prompt buttons are two trigger surfaces for the same
//! small set of actions, so both lookups resolve to [`ComposeAction`] and a
//! single [`CommandExpander`] turns an action into the command Poppit runs.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Tool every command is issued through.
pub const COMPOSE_TOOL: &str = "docker compose";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComposeAction {
    Ps,
    Up,
    Down,
    Restart,
    Logs,
}

impl ComposeAction {
    /// Actions offered as reactions and buttons, in display order.
    pub const TRIGGERABLE: [ComposeAction; 4] = [
        ComposeAction::Up,
        ComposeAction::Down,
        ComposeAction::Restart,
        ComposeAction::Logs,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ComposeAction::Ps => "Status",
            ComposeAction::Up => "Up",
            ComposeAction::Down => "Down",
            ComposeAction::Restart => "Restart",
            ComposeAction::Logs => "Logs",
        }
    }

    /// Block Kit `action_id` of the prompt button for this action. Status has
    /// no button.
    #[must_use]
    pub fn button_id(self) -> Option<&'static str> {
        match self {
            ComposeAction::Ps => None,
            ComposeAction::Up => Some("compose_up"),
            ComposeAction::Down => Some("compose_down"),
            ComposeAction::Restart => Some("compose_restart"),
            ComposeAction::Logs => Some("compose_logs"),
        }
    }
}

static REACTION_ACTIONS: Lazy<HashMap<&'static str, ComposeAction>> = Lazy::new(|| {
    HashMap::from([
        ("up_arrow", ComposeAction::Up),
        ("down_arrow", ComposeAction::Down),
        ("arrows_counterclockwise", ComposeAction::Restart),
        ("scroll", ComposeAction::Logs),
    ])
});

static BUTTON_ACTIONS: Lazy<HashMap<&'static str, ComposeAction>> = Lazy::new(|| {
    ComposeAction::TRIGGERABLE
        .iter()
        .filter_map(|&action| action.button_id().map(|id| (id, action)))
        .collect()
});

/// Action bound to an emoji reaction name, if any.
#[must_use]
pub fn action_for_reaction(reaction: &str) -> Option<ComposeAction> {
    REACTION_ACTIONS.get(reaction).copied()
}

/// Action bound to a prompt button `action_id`, if any.
#[must_use]
pub fn action_for_button(action_id: &str) -> Option<ComposeAction> {
    BUTTON_ACTIONS.get(action_id).copied()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandExpander {
    log_line_limit: u32,
}

impl CommandExpander {
    #[must_use]
    pub fn new(log_line_limit: u32) -> Self {
        Self { log_line_limit }
    }

    #[must_use]
    pub fn expand(&self, action: ComposeAction) -> String {
        match action {
            ComposeAction::Ps => format!("{COMPOSE_TOOL} ps"),
            ComposeAction::Up => format!("{COMPOSE_TOOL} up -d"),
            ComposeAction::Down => format!("{COMPOSE_TOOL} down"),
            ComposeAction::Restart => format!("{COMPOSE_TOOL} restart"),
            ComposeAction::Logs => format!("{COMPOSE_TOOL} logs -n {}", self.log_line_limit),
        }
    }
}
