//! Long-lived listener tasks, one per inbound channel.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{error, info, warn};

use super::{EventRouter, Route};
use crate::bus::BusStream;
use crate::errors::ComposeError;

/// How long shutdown waits for listeners before giving up on them.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Pause before resubscribing after a subscription ends.
const RESUBSCRIBE_DELAY: Duration = Duration::from_millis(500);
const MAX_RESUBSCRIBE_DELAY: Duration = Duration::from_secs(30);

/// Handles of the running listener tasks.
pub struct Listeners {
    handles: Vec<(Route, JoinHandle<()>)>,
}

impl Listeners {
    /// Wait for every listener to return, up to `grace`. Returns `false` if the
    /// grace period ran out first.
    pub async fn wait(self, grace: Duration) -> bool {
        let joined = join_all(self.handles.into_iter().map(|(route, handle)| async move {
            if let Err(e) = handle.await {
                error!(route = %route, "Listener task failed: {}", e);
            }
        }));

        tokio::time::timeout(grace, joined).await.is_ok()
    }
}

impl EventRouter {
    /// Subscribe every route, then spawn one listener per subscription.
    ///
    /// All subscriptions are made before any task starts, so a bus failure
    /// surfaces here rather than inside a task.
    ///
    /// # Errors
    ///
    /// Returns an error if any subscription fails.
    pub async fn start(
        self: Arc<Self>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Listeners, ComposeError> {
        let mut subscriptions = Vec::with_capacity(Route::ALL.len());
        for route in Route::ALL {
            let stream = self.bus.subscribe(self.channel_for(route)).await?;
            subscriptions.push((route, stream));
        }

        let handles = subscriptions
            .into_iter()
            .map(|(route, stream)| {
                let router = Arc::clone(&self);
                let shutdown = shutdown.clone();
                (route, tokio::spawn(listen(router, route, stream, shutdown)))
            })
            .collect();

        Ok(Listeners { handles })
    }
}

async fn listen(
    router: Arc<EventRouter>,
    route: Route,
    mut stream: BusStream,
    mut shutdown: watch::Receiver<bool>,
) {
    info!(route = %route, channel = %router.channel_for(route), "Listening");

    loop {
        if *shutdown.borrow() {
            break;
        }

        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                // sender gone means nobody can ever signal us again
                if changed.is_err() {
                    break;
                }
            }
            next = stream.next() => match next {
                Some(payload) => router.route(route, &payload).await,
                None => {
                    warn!(route = %route, "Subscription closed, resubscribing");
                    match resubscribe(&router, route, &mut shutdown).await {
                        Some(fresh) => stream = fresh,
                        None => break,
                    }
                }
            },
        }
    }

    info!(route = %route, "Listener stopped");
}

/// Subscribe `route` again, backing off between failed attempts. Returns
/// `None` once shutdown is signalled.
async fn resubscribe(
    router: &EventRouter,
    route: Route,
    shutdown: &mut watch::Receiver<bool>,
) -> Option<BusStream> {
    let channel = router.channel_for(route);
    // 2^n * 500ms: 1s, 2s, 4s, ... capped
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(500)
        .max_delay(MAX_RESUBSCRIBE_DELAY);

    let attempt = async {
        tokio::time::sleep(RESUBSCRIBE_DELAY).await;
        Retry::spawn(strategy, move || async move {
            let result = router.bus.subscribe(channel).await;
            if let Err(e) = &result {
                warn!(route = %route, channel = %channel, "Resubscribe failed: {}", e);
            }
            result
        })
        .await
    };

    tokio::select! {
        biased;
        _ = shutdown.changed() => None,
        result = attempt => match result {
            Ok(stream) => {
                info!(route = %route, channel = %channel, "Resubscribed");
                Some(stream)
            }
            Err(e) => {
                error!(route = %route, "Giving up on subscription: {}", e);
                None
            }
        },
    }
}
