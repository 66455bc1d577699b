use serde_json::Value;
use slack_compose::core::commands::{ComposeAction, action_for_button};
use slack_compose::core::projects::{Project, ProjectRegistry};
use slack_compose::slack::prompt_builder::{
    PROJECT_SELECT_ACTION_ID, PROJECT_SELECT_BLOCK_ID, build_project_prompt,
};
use slack_compose::slack::response_builder::project_prompt_message;

fn registry(names: &[&str]) -> ProjectRegistry {
    ProjectRegistry::from_projects(
        names
            .iter()
            .map(|name| Project {
                name: (*name).to_string(),
                working_dir: format!("/srv/{name}"),
            })
            .collect(),
    )
}

fn option_values(blocks: &Value) -> Vec<String> {
    blocks[0]["accessory"]["options"]
        .as_array()
        .expect("select should have options")
        .iter()
        .map(|o| o["value"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[test]
fn test_prompt_lists_projects_in_config_order() {
    let blocks = build_project_prompt(&registry(&["zeta", "alpha", "mid"]), None);

    assert_eq!(blocks[0]["block_id"], PROJECT_SELECT_BLOCK_ID);
    assert_eq!(blocks[0]["accessory"]["type"], "static_select");
    assert_eq!(blocks[0]["accessory"]["action_id"], PROJECT_SELECT_ACTION_ID);
    assert_eq!(option_values(&blocks), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_prompt_buttons_resolve_to_actions() {
    let blocks = build_project_prompt(&registry(&["web"]), None);
    let buttons = blocks[1]["elements"]
        .as_array()
        .expect("actions block should have elements");

    let actions: Vec<ComposeAction> = buttons
        .iter()
        .filter_map(|b| b["action_id"].as_str().and_then(action_for_button))
        .collect();

    assert_eq!(actions, ComposeAction::TRIGGERABLE.to_vec());
    assert!(buttons.iter().all(|b| b["type"] == "button"));
}

#[test]
fn test_destructive_button_is_styled_as_danger() {
    let blocks = build_project_prompt(&registry(&["web"]), None);
    let down = blocks[1]["elements"]
        .as_array()
        .and_then(|buttons| buttons.iter().find(|b| b["action_id"] == "compose_down"))
        .expect("down button should be present");

    assert_eq!(down["style"], "danger");
}

#[test]
fn test_prompt_mentions_requested_project() {
    let blocks = build_project_prompt(&registry(&["web"]), Some("webb"));
    let text = blocks[0]["text"]["text"].as_str().unwrap_or_default();

    assert!(text.contains("webb"), "prompt text should name the requested project: {text}");
}

#[test]
fn test_empty_registry_prompt_has_no_select() {
    let blocks = build_project_prompt(&ProjectRegistry::default(), None);
    let blocks = blocks.as_array().expect("blocks should be an array");

    assert_eq!(blocks.len(), 1);
    assert!(blocks[0].get("accessory").is_none());
}

#[test]
fn test_select_is_capped_at_slack_limit() {
    let names: Vec<String> = (0..120).map(|i| format!("project-{i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let blocks = build_project_prompt(&registry(&name_refs), None);

    assert_eq!(option_values(&blocks).len(), 100);
}

#[test]
fn test_prompt_message_carries_dialog_metadata() {
    let message = project_prompt_message("C1", &registry(&["web"]), Some("nope"));

    assert_eq!(message.channel, "C1");
    assert_eq!(message.metadata.event_type, "slack-compose-dialog");
    assert_eq!(message.metadata.event_payload["requested"], "nope");
    assert!(message.ttl.is_none());
    assert!(message.thread_ts.is_none());
    assert!(message.text.is_some());
}
