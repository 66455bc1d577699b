use serde_json::{Value, json};
use tracing::warn;

use crate::core::commands::ComposeAction;
use crate::core::projects::ProjectRegistry;

/// `block_id` of the section holding the project picker.
pub const PROJECT_SELECT_BLOCK_ID: &str = "project_select_block";
/// `action_id` of the project picker itself.
pub const PROJECT_SELECT_ACTION_ID: &str = "project_select";
pub const ACTIONS_BLOCK_ID: &str = "compose_actions";

/// Slack rejects `static_select` menus with more options than this.
const MAX_SELECT_OPTIONS: usize = 100;

#[must_use]
pub fn prompt_fallback_text(requested: Option<&str>) -> String {
    match requested {
        Some(name) => format!("Unknown project `{name}`. Choose a project and an action."),
        None => "Choose a project and an action.".to_string(),
    }
}

fn project_option(name: &str) -> Value {
    json!({
        "text": { "type": "plain_text", "text": name },
        "value": name
    })
}

fn action_button(action: ComposeAction) -> Option<Value> {
    let id = action.button_id()?;
    let mut button = json!({
        "type": "button",
        "action_id": id,
        "text": { "type": "plain_text", "text": action.label() },
        "value": id
    });
    match action {
        ComposeAction::Up => button["style"] = json!("primary"),
        ComposeAction::Down => button["style"] = json!("danger"),
        _ => {}
    }
    Some(button)
}

/// Build the Block Kit blocks for the project selection prompt:
/// - a section with a `static_select` listing every project in config order
/// - an actions block with one button per triggerable compose action
///
/// With no projects configured only an explanatory section is returned.
#[must_use]
pub fn build_project_prompt(projects: &ProjectRegistry, requested: Option<&str>) -> Value {
    if projects.is_empty() {
        return json!([{
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": "No projects are configured for SlackCompose."
            }
        }]);
    }

    if projects.len() > MAX_SELECT_OPTIONS {
        warn!(
            count = projects.len(),
            "Too many projects for one select menu, truncating to {}", MAX_SELECT_OPTIONS
        );
    }

    let options: Vec<Value> = projects
        .iter()
        .take(MAX_SELECT_OPTIONS)
        .map(|p| project_option(&p.name))
        .collect();

    let buttons: Vec<Value> = ComposeAction::TRIGGERABLE
        .into_iter()
        .filter_map(action_button)
        .collect();

    json!([
        {
            "type": "section",
            "block_id": PROJECT_SELECT_BLOCK_ID,
            "text": { "type": "mrkdwn", "text": prompt_fallback_text(requested) },
            "accessory": {
                "type": "static_select",
                "action_id": PROJECT_SELECT_ACTION_ID,
                "placeholder": { "type": "plain_text", "text": "Select a project" },
                "options": options
            }
        },
        {
            "type": "actions",
            "block_id": ACTIONS_BLOCK_ID,
            "elements": buttons
        }
    ])
}
