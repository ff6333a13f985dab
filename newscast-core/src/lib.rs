pub mod assist;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod feed;
pub mod messaging;
pub mod pool;
pub mod registry;
pub mod router;
pub mod users;

/// Addressable recipient of replies and push notifications.
pub type ConsumerId = i64;

pub use assist::{AssistConfig, Assistant, GenerationService, HttpGenerator};
pub use config::AppConfig;
pub use dispatcher::{dispatch_cycle, spawn_dispatcher, DispatchConfig, DispatcherHandle};
pub use error::{DispatchError, FetchError, GenError, SendError};
pub use feed::{FeedItem, FeedSource, HttpFeedSource};
pub use messaging::{MenuButton, MenuControls, MessagingEndpoint, OutboundMessage, TextFormat};
pub use pool::SamplingPools;
pub use registry::SubscriptionRegistry;
pub use router::{classify, Command, CommandRouter, Intent, RouterConfig};
pub use users::{UserStats, UserStore};
