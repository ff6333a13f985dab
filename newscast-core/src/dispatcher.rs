use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::DispatchError;
use crate::feed::FeedSource;
use crate::messaging::{MessagingEndpoint, OutboundMessage};
use crate::registry::SubscriptionRegistry;

#[derive(Debug, Clone, Copy)]
pub struct DispatchConfig {
    pub interval: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(120),
        }
    }
}

pub struct DispatcherHandle {
    stop_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl DispatcherHandle {
    pub async fn stop(self) -> Result<(), DispatchError> {
        let _ = self.stop_tx.send(());
        self.join.await.map_err(DispatchError::from)
    }
}

/// Runs one dispatch cycle and returns the number of notifications sent.
///
/// An empty subscriber set skips the fetch entirely; an empty fetch is
/// treated as transient unavailability and leaves every marker untouched.
/// Only the newest item is considered: the loop notifies about freshness,
/// never a backlog. A failed send to one subscriber does not block the
/// others, and the marker is already advanced by then, so delivery is
/// at-most-once per item per subscriber.
pub async fn dispatch_cycle(
    registry: &SubscriptionRegistry,
    source: &Arc<dyn FeedSource>,
    endpoint: &Arc<dyn MessagingEndpoint>,
) -> usize {
    if registry.is_empty().await {
        return 0;
    }
    let items = source.fetch().await;
    let Some(newest) = items.first() else {
        debug!("feed unavailable this cycle");
        return 0;
    };

    let mut sent = 0;
    for consumer in registry.snapshot().await {
        if !registry.mark_and_check(consumer, &newest.link).await {
            continue;
        }
        let text = format!(
            "🆕 <b>NEW UPDATE!</b>\n✅ {}\n{}",
            newest.title, newest.link
        );
        match endpoint.send(consumer, OutboundMessage::html(text)).await {
            Ok(()) => sent += 1,
            Err(err) => warn!(%consumer, error = %err, "failed to push update"),
        }
    }
    sent
}

/// Spawns the background dispatch loop on a fixed interval. The loop never
/// exits on its own; [`DispatcherHandle::stop`] signals and joins it.
pub fn spawn_dispatcher(
    registry: SubscriptionRegistry,
    source: Arc<dyn FeedSource>,
    endpoint: Arc<dyn MessagingEndpoint>,
    config: DispatchConfig,
) -> DispatcherHandle {
    let (stop_tx, mut stop_rx) = broadcast::channel(1);
    let join = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = stop_rx.recv() => {
                    info!("dispatcher shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    let sent = dispatch_cycle(&registry, &source, &endpoint).await;
                    if sent > 0 {
                        info!(sent, "pushed feed update");
                    }
                }
            }
        }
    });

    DispatcherHandle { stop_tx, join }
}
