use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use rand::seq::SliceRandom;
use tokio::sync::RwLock;
use tracing::debug;

use crate::feed::{FeedItem, FeedSource};
use crate::ConsumerId;

/// Per-consumer shuffled draw orders over the current fetch.
///
/// Each consumer owns a queue of indices produced by a full shuffle of
/// `0..items.len()`. Draws consume from the front, so within one pool's
/// lifetime no index is served twice. When fewer than `batch_size` indices
/// remain the pool is replaced by a fresh shuffle before the draw is served.
/// Pools are kept across fetches; a pool built over an older item list may
/// reference indices past the end of a smaller fetch, which are skipped.
#[derive(Clone)]
pub struct SamplingPools {
    source: Arc<dyn FeedSource>,
    pools: Arc<RwLock<HashMap<ConsumerId, VecDeque<usize>>>>,
}

impl SamplingPools {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self {
            source,
            pools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Draws up to `batch_size` items for `consumer` without repetition.
    ///
    /// Returns an empty vec when the feed is unavailable. When the fetch
    /// holds fewer than `batch_size` items the permutation is shorter than
    /// requested and the draw returns what it has; degraded, not an error.
    pub async fn draw(&self, consumer: ConsumerId, batch_size: usize) -> Vec<FeedItem> {
        let items = self.source.fetch().await;
        if items.is_empty() || batch_size == 0 {
            return Vec::new();
        }

        let mut pools = self.pools.write().await;
        let pool = pools.entry(consumer).or_default();
        if pool.len() < batch_size {
            debug!(%consumer, remaining = pool.len(), "reshuffling sampling pool");
            let mut order: Vec<usize> = (0..items.len()).collect();
            order.shuffle(&mut rand::thread_rng());
            *pool = order.into();
        }

        let take = batch_size.min(pool.len());
        pool.drain(..take)
            .filter_map(|idx| items.get(idx).cloned())
            .collect()
    }
}
