//! Event bus gateway: pub/sub subscriptions plus append-only lists.

pub mod memory;
pub mod redis;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::errors::ComposeError;

pub use self::memory::MemoryBus;
pub use self::redis::RedisBus;

/// Raw payloads received on one subscription, in arrival order.
pub type BusStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Shared handle to the bus. Implementations must be safe to use from many
/// tasks at once without caller-side locking.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Subscribe to a pub/sub channel. Dropping the stream releases the
    /// subscription.
    async fn subscribe(&self, channel: &str) -> Result<BusStream, ComposeError>;

    /// Append a payload to the tail of a list.
    async fn push(&self, list: &str, payload: &str) -> Result<(), ComposeError>;
}
