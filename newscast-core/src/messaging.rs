use async_trait::async_trait;

use crate::error::SendError;
use crate::ConsumerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// An interactive control attached to a reply; the transport renders it as
/// a button whose press comes back to the router as `action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub action: String,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuControls {
    pub buttons: Vec<MenuButton>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub format: TextFormat,
    pub controls: Option<MenuControls>,
}

impl OutboundMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Plain,
            controls: None,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            format: TextFormat::Html,
            controls: None,
        }
    }

    pub fn with_controls(mut self, controls: MenuControls) -> Self {
        self.controls = Some(controls);
        self
    }
}

/// Outbound side of the chat transport. Delivery is fire-and-forget: the
/// caller only learns whether the call itself failed, and no ordering is
/// guaranteed across consumers.
#[async_trait]
pub trait MessagingEndpoint: Send + Sync {
    async fn send(&self, consumer: ConsumerId, message: OutboundMessage) -> Result<(), SendError>;
}
