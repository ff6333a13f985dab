use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::ConsumerId;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct UserData {
    // consumer -> rating, 1..=5, first write wins
    ratings: HashMap<ConsumerId, u8>,
    users: HashSet<ConsumerId>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserStats {
    pub total_users: usize,
    pub total_ratings: usize,
    pub average_rating: f64,
}

/// Persisted record of every consumer ever seen and their one-shot ratings.
///
/// The whole document is loaded once at startup and rewritten on every
/// mutation. Durability is best-effort: a failed flush is logged and the
/// in-memory state keeps serving.
#[derive(Debug, Clone)]
pub struct UserStore {
    inner: Arc<RwLock<UserData>>,
    path: Option<PathBuf>,
}

impl UserStore {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(UserData::default())),
            path: None,
        }
    }

    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<UserData>(&bytes) {
                Ok(data) => data,
                Err(err) => {
                    warn!(error = %err, path = %path.display(), "corrupted user store, trying tmp fallback");
                    match tokio::fs::read(path.with_extension("json.tmp")).await {
                        Ok(tmp) => serde_json::from_slice(&tmp).unwrap_or_default(),
                        Err(_) => UserData::default(),
                    }
                }
            },
            Err(_) => UserData::default(),
        };
        Self {
            inner: Arc::new(RwLock::new(data)),
            path: Some(path),
        }
    }

    /// Records a consumer as seen; flushes only on first sight.
    pub async fn note_user(&self, consumer: ConsumerId) {
        let inserted = self.inner.write().await.users.insert(consumer);
        if inserted {
            self.persist().await;
        }
    }

    /// Set-if-absent rating write. Returns true iff the rating was recorded;
    /// an existing rating is never overwritten.
    pub async fn rate(&self, consumer: ConsumerId, stars: u8) -> bool {
        if !(1..=5).contains(&stars) {
            return false;
        }
        let recorded = {
            let mut inner = self.inner.write().await;
            if inner.ratings.contains_key(&consumer) {
                false
            } else {
                inner.ratings.insert(consumer, stars);
                true
            }
        };
        if recorded {
            self.persist().await;
        }
        recorded
    }

    pub async fn rating_of(&self, consumer: ConsumerId) -> Option<u8> {
        self.inner.read().await.ratings.get(&consumer).copied()
    }

    pub async fn stats(&self) -> UserStats {
        let inner = self.inner.read().await;
        let total_ratings = inner.ratings.len();
        let average_rating = if total_ratings > 0 {
            inner.ratings.values().map(|&s| s as f64).sum::<f64>() / total_ratings as f64
        } else {
            0.0
        };
        UserStats {
            total_users: inner.users.len(),
            total_ratings,
            average_rating,
        }
    }

    async fn persist(&self) {
        let Some(path) = &self.path else {
            debug!("user store is in-memory only; skipping persist");
            return;
        };
        let inner = self.inner.read().await;
        let bytes = match serde_json::to_vec_pretty(&*inner) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "failed to serialize user store");
                return;
            }
        };
        drop(inner);
        if let Some(parent) = path.parent() {
            let _ = tokio::fs::create_dir_all(parent).await;
        }
        // Atomic rewrite: write the tmp file, then rename over the store.
        let tmp = path.with_extension("json.tmp");
        if let Err(err) = tokio::fs::write(&tmp, &bytes).await {
            warn!(error = %err, path = %tmp.display(), "failed to write user store tmp file");
            return;
        }
        if let Err(err) = tokio::fs::rename(&tmp, path).await {
            warn!(error = %err, path = %path.display(), "failed to persist user store");
        }
    }
}
