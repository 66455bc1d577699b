//! SlackCompose - drives `docker compose` on configured projects from Slack.
//!
//! The service sits between three other services on a shared Redis instance:
//! 1. Slack relays publish slash commands, emoji reactions, and interactive
//!    block actions to pub/sub channels
//! 2. Poppit consumes execution requests from a list, runs the commands, and
//!    publishes their output to another channel
//! 3. SlackLiner consumes chat messages from a list and posts them to Slack
//!
//! # Architecture
//!
//! The router is stateless. Every execution request carries correlation
//! metadata (project, and for threaded contexts the Slack channel and thread
//! timestamp) that Poppit echoes back on its output, and every output message
//! posted to Slack carries the project in its message metadata so a later
//! reaction can be routed. Nothing about in-flight work is held in memory, so a
//! restart loses nothing that the messages themselves don't carry.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use slack_compose::bus::RedisBus;
//! use slack_compose::core::config::AppConfig;
//! use slack_compose::core::projects::ProjectRegistry;
//! use slack_compose::router::{EventRouter, SHUTDOWN_GRACE};
//! use slack_compose::slack::SlackClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     slack_compose::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let projects = ProjectRegistry::load(&config.project_config_path)?;
//!     let bus = RedisBus::connect(&config.redis_url()).await?;
//!     let slack = SlackClient::new(config.slack_bot_token.clone());
//!
//!     let router = Arc::new(EventRouter::new(
//!         Arc::new(config),
//!         Arc::new(projects),
//!         Arc::new(bus),
//!         Arc::new(slack),
//!     ));
//!
//!     let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let listeners = router.start(shutdown_rx).await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     shutdown_tx.send(true)?;
//!     listeners.wait(SHUTDOWN_GRACE).await;
//!     Ok(())
//! }
//! ```
// Module declarations
pub mod bus;
pub mod core;
pub mod errors;
pub mod router;
pub mod slack;

pub use errors::ComposeError;
pub use router::EventRouter;

/// Configure structured JSON logging.
///
/// The level filter comes from `RUST_LOG` and defaults to `info`. Calling this
/// more than once is harmless; later calls leave the first subscriber in place.
///
/// # Example
///
/// ```
/// slack_compose::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
