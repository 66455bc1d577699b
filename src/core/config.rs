use std::env;

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::warn;

use crate::errors::ComposeError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub redis_addr: String,
    pub redis_password: String,
    pub redis_db: i64,

    /// Pub/sub channel carrying slash commands from the command relay.
    pub slack_command_channel: String,
    /// Pub/sub channel carrying `reaction_added` events.
    pub slack_reaction_channel: String,
    /// Pub/sub channel carrying `block_actions` interactive payloads.
    pub slack_block_actions_channel: String,
    /// List consumed by Poppit for execution requests.
    pub poppit_list_name: String,
    /// Pub/sub channel Poppit publishes command output on.
    pub poppit_output_channel: String,
    /// List consumed by SlackLiner for outbound chat messages.
    pub slackliner_list_name: String,

    pub slack_bot_token: String,
    /// Channel used when an event carries no channel of its own.
    pub slack_channel: String,
    pub slack_command_name: String,

    pub project_config_path: String,
    pub log_line_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redis_addr: "localhost:6379".to_string(),
            redis_password: String::new(),
            redis_db: 0,
            slack_command_channel: "slack-commands".to_string(),
            slack_reaction_channel: "slack-reactions".to_string(),
            slack_block_actions_channel: "slack-relay-block-actions".to_string(),
            poppit_list_name: "poppit:notifications".to_string(),
            poppit_output_channel: "poppit:command-output".to_string(),
            slackliner_list_name: "slack_messages".to_string(),
            slack_bot_token: String::new(),
            slack_channel: "#slack-compose".to_string(),
            slack_command_name: "/slack-compose".to_string(),
            project_config_path: "projects.json".to_string(),
            log_line_limit: 100,
        }
    }
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when `SLACK_BOT_TOKEN` is unset or empty.
    pub fn from_env() -> Result<Self, ComposeError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Unset and empty values
    /// fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when `SLACK_BOT_TOKEN` is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ComposeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let env_or = |key: &str, default: String| {
            lookup(key).filter(|v| !v.is_empty()).unwrap_or(default)
        };

        let config = Self {
            redis_addr: env_or("REDIS_ADDR", defaults.redis_addr),
            redis_password: env_or("REDIS_PASSWORD", defaults.redis_password),
            redis_db: parse_or("REDIS_DB", lookup("REDIS_DB"), defaults.redis_db),
            slack_command_channel: env_or("SLACK_COMMAND_CHANNEL", defaults.slack_command_channel),
            slack_reaction_channel: env_or(
                "SLACK_REACTION_CHANNEL",
                defaults.slack_reaction_channel,
            ),
            slack_block_actions_channel: env_or(
                "SLACK_BLOCK_ACTIONS_CHANNEL",
                defaults.slack_block_actions_channel,
            ),
            poppit_list_name: env_or("POPPIT_LIST_NAME", defaults.poppit_list_name),
            poppit_output_channel: env_or("POPPIT_OUTPUT_CHANNEL", defaults.poppit_output_channel),
            slackliner_list_name: env_or("SLACKLINER_LIST_NAME", defaults.slackliner_list_name),
            slack_bot_token: env_or("SLACK_BOT_TOKEN", defaults.slack_bot_token),
            slack_channel: env_or("SLACK_CHANNEL", defaults.slack_channel),
            slack_command_name: env_or("SLACK_COMMAND_NAME", defaults.slack_command_name),
            project_config_path: env_or("PROJECT_CONFIG_PATH", defaults.project_config_path),
            log_line_limit: parse_or(
                "LOG_LINE_LIMIT",
                lookup("LOG_LINE_LIMIT"),
                defaults.log_line_limit,
            ),
        };

        if config.slack_bot_token.is_empty() {
            return Err(ComposeError::ConfigError(
                "SLACK_BOT_TOKEN is required".to_string(),
            ));
        }

        Ok(config)
    }

    /// Connection URL for the Redis client, e.g. `redis://:secret@host:6379/2`.
    /// The password is percent-encoded.
    #[must_use]
    pub fn redis_url(&self) -> String {
        if self.redis_password.is_empty() {
            format!("redis://{}/{}", self.redis_addr, self.redis_db)
        } else {
            format!(
                "redis://:{}@{}/{}",
                utf8_percent_encode(&self.redis_password, NON_ALPHANUMERIC),
                self.redis_addr,
                self.redis_db
            )
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match raw {
        Some(value) if !value.is_empty() => value.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={value} is not a valid number, using {default}");
            default
        }),
        _ => default,
    }
}
