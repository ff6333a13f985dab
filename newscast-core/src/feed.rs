use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::error::FetchError;

/// One unit of content from the external feed. The link is the item's
/// identity within a fetch; snapshots are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
}

impl FeedItem {
    pub fn from_rss_item(item: &rss::Item) -> Self {
        Self {
            title: item.title().unwrap_or("No Title").to_owned(),
            link: item.link().unwrap_or_default().to_owned(),
        }
    }
}

/// Source of feed items. Implementations must treat an empty result as
/// "temporarily unavailable" rather than raising; callers own the retry
/// cadence.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Vec<FeedItem>;
}

/// HTTP feed source. Each fetch is a fresh round trip with a bounded
/// timeout; there is no caching and no internal retry.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    url: String,
    timeout: Duration,
}

impl HttpFeedSource {
    pub fn new(client: Client, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            url: url.into(),
            timeout,
        }
    }

    pub async fn try_fetch(&self) -> Result<Vec<FeedItem>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let bytes = response.bytes().await?;
        let channel = rss::Channel::read_from(&bytes[..])?;
        Ok(channel.items().iter().map(FeedItem::from_rss_item).collect())
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Vec<FeedItem> {
        match self.try_fetch().await {
            Ok(items) => items,
            Err(err) => {
                warn!(url = %self.url, error = %err, "feed fetch failed");
                Vec::new()
            }
        }
    }
}
