use async_trait::async_trait;
use futures::{StreamExt, future};
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{info, warn};

use super::{BusStream, EventBus};
use crate::errors::ComposeError;

/// Redis-backed bus. List writes share one multiplexed connection manager;
/// every subscription opens its own pub/sub connection.
#[derive(Clone)]
pub struct RedisBus {
    client: redis::Client,
    manager: ConnectionManager,
}

impl RedisBus {
    /// Opens the client and establishes the shared connection.
    ///
    /// # Errors
    ///
    /// Returns `BusError` if the URL is invalid or Redis is unreachable.
    pub async fn connect(url: &str) -> Result<Self, ComposeError> {
        let client = redis::Client::open(url)
            .map_err(|e| ComposeError::BusError(format!("Invalid Redis URL: {e}")))?;
        let manager = client
            .get_connection_manager()
            .await
            .map_err(|e| ComposeError::BusError(format!("Failed to connect to Redis: {e}")))?;
        Ok(Self { client, manager })
    }
}

#[async_trait]
impl EventBus for RedisBus {
    async fn subscribe(&self, channel: &str) -> Result<BusStream, ComposeError> {
        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(channel).await?;
        info!(channel = %channel, "Subscribed to Redis channel");

        let channel = channel.to_string();
        let stream = pubsub.into_on_message().filter_map(move |msg| {
            let payload = match msg.get_payload::<String>() {
                Ok(payload) => Some(payload),
                Err(e) => {
                    warn!(channel = %channel, "Dropping non-UTF-8 message: {}", e);
                    None
                }
            };
            future::ready(payload)
        });

        Ok(Box::pin(stream))
    }

    async fn push(&self, list: &str, payload: &str) -> Result<(), ComposeError> {
        let mut conn = self.manager.clone();
        conn.rpush::<_, _, ()>(list, payload)
            .await
            .map_err(|e| ComposeError::BusError(format!("Failed to push to {list}: {e}")))
    }
}
