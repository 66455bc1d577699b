//! In-process bus used by tests and local dry runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::channel::mpsc::{UnboundedSender, unbounded};

use super::{BusStream, EventBus};
use crate::errors::ComposeError;

#[derive(Debug, Default)]
pub struct MemoryBus {
    lists: Mutex<HashMap<String, Vec<String>>>,
    subscribers: Mutex<HashMap<String, Vec<UnboundedSender<String>>>>,
    failing_pushes: AtomicUsize,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `payload` to every live subscriber of `channel` and returns how
    /// many received it.
    pub fn publish(&self, channel: &str, payload: &str) -> usize {
        let mut subscribers = locked(&self.subscribers);
        let Some(senders) = subscribers.get_mut(channel) else {
            return 0;
        };
        senders.retain(|tx| tx.unbounded_send(payload.to_string()).is_ok());
        senders.len()
    }

    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        locked(&self.subscribers)
            .get(channel)
            .map_or(0, |senders| senders.iter().filter(|tx| !tx.is_closed()).count())
    }

    /// Everything appended to `list` so far, oldest first.
    #[must_use]
    pub fn pushed(&self, list: &str) -> Vec<String> {
        locked(&self.lists).get(list).cloned().unwrap_or_default()
    }

    /// Makes the next `count` pushes fail with `BusError`.
    pub fn fail_next_pushes(&self, count: usize) {
        self.failing_pushes.store(count, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.failing_pushes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl EventBus for MemoryBus {
    async fn subscribe(&self, channel: &str) -> Result<BusStream, ComposeError> {
        let (tx, rx) = unbounded();
        locked(&self.subscribers)
            .entry(channel.to_string())
            .or_default()
            .push(tx);
        Ok(Box::pin(rx))
    }

    async fn push(&self, list: &str, payload: &str) -> Result<(), ComposeError> {
        if self.take_failure() {
            return Err(ComposeError::BusError(format!(
                "Injected push failure for {list}"
            )));
        }
        locked(&self.lists)
            .entry(list.to_string())
            .or_default()
            .push(payload.to_string());
        Ok(())
    }
}
