use std::sync::Arc;

use anyhow::{Context, Result};
use slack_compose::bus::RedisBus;
use slack_compose::core::config::AppConfig;
use slack_compose::core::projects::ProjectRegistry;
use slack_compose::router::{EventRouter, SHUTDOWN_GRACE};
use slack_compose::slack::SlackClient;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    slack_compose::setup_logging();
    info!("Starting SlackCompose service");

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let projects = ProjectRegistry::load(&config.project_config_path)
        .context("Failed to load project config")?;

    let bus = RedisBus::connect(&config.redis_url())
        .await
        .with_context(|| format!("Failed to connect to Redis at {}", config.redis_addr))?;
    info!(addr = %config.redis_addr, db = config.redis_db, "Connected to Redis");

    let slack = SlackClient::new(config.slack_bot_token.clone());

    let router = Arc::new(EventRouter::new(
        Arc::new(config),
        Arc::new(projects),
        Arc::new(bus),
        Arc::new(slack),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let listeners = router
        .start(shutdown_rx)
        .await
        .context("Failed to subscribe to Redis channels")?;
    info!("Service started");

    shutdown_signal().await;
    info!("Shutting down SlackCompose service");

    // receivers live inside the listener tasks, so this cannot fail while they run
    let _ = shutdown_tx.send(true);
    if !listeners.wait(SHUTDOWN_GRACE).await {
        warn!(
            "Listeners did not stop within {}s, exiting anyway",
            SHUTDOWN_GRACE.as_secs()
        );
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
