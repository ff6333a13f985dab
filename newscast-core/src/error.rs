use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("feed returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("feed parsing error: {0}")]
    Parse(#[from] rss::Error),
}

#[derive(Debug, Error)]
pub enum GenError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("generation API returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("generation response carried no usable payload")]
    EmptyResponse,
}

/// Delivery failure reported by a messaging endpoint implementation.
#[derive(Debug, Error)]
#[error("delivery failed: {0}")]
pub struct SendError(pub String);

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatcher task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
