use std::sync::Arc;

use tracing::{debug, warn};

use crate::assist::Assistant;
use crate::feed::{FeedItem, FeedSource};
use crate::messaging::{MenuButton, MenuControls, MessagingEndpoint, OutboundMessage};
use crate::pool::SamplingPools;
use crate::registry::SubscriptionRegistry;
use crate::users::UserStore;
use crate::ConsumerId;

/// A symbolic inbound action resolved to an operation. Anything the parser
/// does not recognize maps to `Unknown`, which the router treats as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Menu,
    About,
    Latest,
    Random,
    Subscribe,
    Unsubscribe,
    Rate,
    RateVote(u8),
    Assist(String),
    Stats,
    Ping,
    Unknown,
}

impl Command {
    /// Total mapping from slash commands and menu-callback ids.
    pub fn parse(action: &str) -> Command {
        let action = action.trim();
        if action == "/ai" {
            return Command::Assist(String::new());
        }
        if let Some(prompt) = action.strip_prefix("/ai ") {
            return Command::Assist(prompt.trim().to_owned());
        }
        if let Some(stars) = action.strip_prefix("rate_") {
            return match stars.parse::<u8>() {
                Ok(stars @ 1..=5) => Command::RateVote(stars),
                _ => Command::Unknown,
            };
        }
        match action {
            "/start" => Command::Start,
            "/help" | "menu_help" | "menu_home" => Command::Help,
            "/menu" => Command::Menu,
            "/about" | "menu_about" => Command::About,
            "/latest" | "menu_latest" => Command::Latest,
            "/random" | "menu_random" => Command::Random,
            "/subscribe" | "menu_autoon" => Command::Subscribe,
            "/unsubscribe" | "menu_autooff" => Command::Unsubscribe,
            "/rate" | "menu_rate" => Command::Rate,
            "/status" => Command::Stats,
            "/ping" | "menu_ping" => Command::Ping,
            _ => Command::Unknown,
        }
    }
}

/// What an assistant prompt is asking for, decided up front so dispatch is
/// a plain match instead of nested substring checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Chat,
    ImageRequest,
    VideoRequest,
}

const IMAGE_TRIGGERS: &[&str] = &[
    "draw", "image", "picture", "generate image", "photo", "create image",
];
const VIDEO_TRIGGERS: &[&str] = &["video", "make video", "generate video", "film", "clip"];

pub fn classify(prompt: &str) -> Intent {
    let lower = prompt.to_lowercase();
    if IMAGE_TRIGGERS.iter().any(|t| lower.contains(t)) {
        Intent::ImageRequest
    } else if VIDEO_TRIGGERS.iter().any(|t| lower.contains(t)) {
        Intent::VideoRequest
    } else {
        Intent::Chat
    }
}

const NO_NEWS: &str = "⚠️ No news available right now.";
const AI_PROMPT_HINT: &str = "Please provide a question or request (e.g. 'draw a sunset').";
const SUBSCRIBED: &str = "🔔 Auto-updates are ON.";
const UNSUBSCRIBED: &str = "🔕 Auto-updates are OFF.";
const ALREADY_RATED: &str = "⚠️ You have already rated the bot! Thank you for your support.";
const RATE_PROMPT: &str = "⭐ <b>How do you like the bot?</b>\nPlease choose a rating:";
const NOT_OWNER: &str = "This command is reserved for the owner.";
const ABOUT: &str = "🤖 <b>Newscast Bot</b>\nFresh feed updates, random picks and an AI assistant.";
const HELP: &str = "📌 <b>COMMANDS</b>\n\
    /latest - 10 latest news\n\
    /random - 5 random news\n\
    /ai question - ask the AI assistant (chat, images, videos)\n\
    /subscribe - push updates on\n\
    /unsubscribe - push updates off\n\
    /rate - rate the bot\n\
    /about - about this bot\n\
    /menu - open the menu";

fn main_menu() -> MenuControls {
    MenuControls {
        buttons: vec![
            MenuButton::new("📰 Latest News", "menu_latest"),
            MenuButton::new("🎲 Random News", "menu_random"),
            MenuButton::new("🔔 Auto: ON", "menu_autoon"),
            MenuButton::new("🔕 Auto: OFF", "menu_autooff"),
            MenuButton::new("⭐ Rate Bot", "menu_rate"),
            MenuButton::new("ℹ️ About", "menu_about"),
            MenuButton::new("❓ Help", "menu_help"),
        ],
    }
}

fn back_to_menu() -> MenuControls {
    MenuControls {
        buttons: vec![MenuButton::new("🔙 Back to Menu", "menu_home")],
    }
}

fn rating_menu() -> MenuControls {
    MenuControls {
        buttons: (1..=5)
            .map(|n| MenuButton::new(format!("{n} ⭐"), format!("rate_{n}")))
            .collect(),
    }
}

fn format_items(heading: &str, items: &[FeedItem]) -> String {
    let mut text = format!("<b>{heading}</b>\n\n");
    for (i, item) in items.iter().enumerate() {
        text.push_str(&format!("✅ {}) {}\n🔗 {}\n\n", i + 1, item.title, item.link));
    }
    text
}

#[derive(Debug, Clone, Copy)]
pub struct RouterConfig {
    pub latest_count: usize,
    pub batch_size: usize,
    pub owner: Option<ConsumerId>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            latest_count: 10,
            batch_size: 5,
            owner: None,
        }
    }
}

/// Stateless dispatch from inbound actions to the stores and seams. Every
/// branch is total; handler errors are logged and never propagate.
pub struct CommandRouter {
    source: Arc<dyn FeedSource>,
    pools: SamplingPools,
    registry: SubscriptionRegistry,
    users: UserStore,
    endpoint: Arc<dyn MessagingEndpoint>,
    assistant: Assistant,
    config: RouterConfig,
}

impl CommandRouter {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Arc<dyn FeedSource>,
        pools: SamplingPools,
        registry: SubscriptionRegistry,
        users: UserStore,
        endpoint: Arc<dyn MessagingEndpoint>,
        assistant: Assistant,
        config: RouterConfig,
    ) -> Self {
        Self {
            source,
            pools,
            registry,
            users,
            endpoint,
            assistant,
            config,
        }
    }

    pub async fn handle(&self, consumer: ConsumerId, action: &str) {
        self.users.note_user(consumer).await;
        match Command::parse(action) {
            Command::Start => {
                let text = "✨ <b>WELCOME TO NEWSCAST BOT</b> ✨\n\n\
                    I can send you the latest news, random picks, and chat with you using AI!\n\n\
                    💡 Use the buttons below to explore.";
                self.reply(consumer, OutboundMessage::html(text).with_controls(main_menu()))
                    .await;
            }
            Command::Help | Command::Menu => {
                self.reply(consumer, OutboundMessage::html(HELP).with_controls(main_menu()))
                    .await;
            }
            Command::About => {
                self.reply(
                    consumer,
                    OutboundMessage::html(ABOUT).with_controls(back_to_menu()),
                )
                .await;
            }
            Command::Latest => {
                let items = self.source.fetch().await;
                if items.is_empty() {
                    self.reply(
                        consumer,
                        OutboundMessage::plain(NO_NEWS).with_controls(back_to_menu()),
                    )
                    .await;
                } else {
                    let head = &items[..items.len().min(self.config.latest_count)];
                    self.reply(
                        consumer,
                        OutboundMessage::html(format_items("LATEST NEWS", head))
                            .with_controls(back_to_menu()),
                    )
                    .await;
                }
            }
            Command::Random => {
                let picks = self.pools.draw(consumer, self.config.batch_size).await;
                if picks.is_empty() {
                    self.reply(
                        consumer,
                        OutboundMessage::plain(NO_NEWS).with_controls(back_to_menu()),
                    )
                    .await;
                } else {
                    self.reply(
                        consumer,
                        OutboundMessage::html(format_items("RANDOM NEWS", &picks))
                            .with_controls(back_to_menu()),
                    )
                    .await;
                }
            }
            Command::Subscribe => {
                self.registry.subscribe(consumer).await;
                self.reply(
                    consumer,
                    OutboundMessage::plain(SUBSCRIBED).with_controls(back_to_menu()),
                )
                .await;
            }
            Command::Unsubscribe => {
                self.registry.unsubscribe(consumer).await;
                self.reply(
                    consumer,
                    OutboundMessage::plain(UNSUBSCRIBED).with_controls(back_to_menu()),
                )
                .await;
            }
            Command::Rate => {
                if self.users.rating_of(consumer).await.is_some() {
                    self.reply(consumer, OutboundMessage::plain(ALREADY_RATED)).await;
                } else {
                    self.reply(
                        consumer,
                        OutboundMessage::html(RATE_PROMPT).with_controls(rating_menu()),
                    )
                    .await;
                }
            }
            Command::RateVote(stars) => {
                if self.users.rate(consumer, stars).await {
                    let text = format!("💖 Thank you for your rating of {stars} stars!");
                    self.reply(
                        consumer,
                        OutboundMessage::plain(text).with_controls(back_to_menu()),
                    )
                    .await;
                } else {
                    self.reply(consumer, OutboundMessage::plain(ALREADY_RATED)).await;
                }
            }
            Command::Assist(prompt) => {
                if prompt.is_empty() {
                    self.reply(consumer, OutboundMessage::plain(AI_PROMPT_HINT)).await;
                    return;
                }
                let intent = classify(&prompt);
                let ack = match intent {
                    Intent::ImageRequest => "🎨 Generating image...",
                    Intent::VideoRequest => "🎬 Generating video...",
                    Intent::Chat => "🤖 Thinking...",
                };
                self.reply(consumer, OutboundMessage::plain(ack)).await;
                let response = match intent {
                    Intent::ImageRequest => self.assistant.image(&prompt).await,
                    Intent::VideoRequest => self.assistant.video(&prompt).await,
                    Intent::Chat => self.assistant.chat(&prompt).await,
                };
                self.reply(consumer, OutboundMessage::plain(response)).await;
            }
            Command::Stats => {
                if self.config.owner != Some(consumer) {
                    self.reply(consumer, OutboundMessage::plain(NOT_OWNER)).await;
                    return;
                }
                let stats = self.users.stats().await;
                let text = format!(
                    "📊 <b>BOT STATUS</b>\n\n👥 Total Users: {}\n⭐ Average Rating: {:.2} / 5 ({} ratings)",
                    stats.total_users, stats.average_rating, stats.total_ratings
                );
                self.reply(
                    consumer,
                    OutboundMessage::html(text).with_controls(back_to_menu()),
                )
                .await;
            }
            Command::Ping => {
                self.reply(consumer, OutboundMessage::html("🏓 <b>Pong!</b>")).await;
            }
            Command::Unknown => {
                debug!(%consumer, action, "ignoring unrecognized action");
            }
        }
    }

    async fn reply(&self, consumer: ConsumerId, message: OutboundMessage) {
        if let Err(err) = self.endpoint.send(consumer, message).await {
            warn!(%consumer, error = %err, "failed to deliver reply");
        }
    }
}
