use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{routing::get, Router};
use reqwest::ClientBuilder;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use newscast_core::{
    spawn_dispatcher, AppConfig, AssistConfig, Assistant, CommandRouter, ConsumerId,
    DispatchConfig, HttpFeedSource, HttpGenerator, MessagingEndpoint, OutboundMessage,
    RouterConfig, SamplingPools, SendError, SubscriptionRegistry, UserStore,
};

/// Stand-in transport: prints outbound messages to stdout. The real chat
/// transport is an external collaborator behind the same trait.
struct ConsoleEndpoint;

#[async_trait]
impl MessagingEndpoint for ConsoleEndpoint {
    async fn send(&self, consumer: ConsumerId, message: OutboundMessage) -> Result<(), SendError> {
        println!("-> [{consumer}] {}", message.text);
        if let Some(controls) = &message.controls {
            for button in &controls.buttons {
                println!("   [{}] ({})", button.label, button.action);
            }
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::load(&config_dir().join("config.json"));
    let client = ClientBuilder::new()
        .user_agent("Newscast/0.1")
        .build()
        .expect("failed to build HTTP client");

    let source = Arc::new(HttpFeedSource::new(
        client.clone(),
        config.feed.url.clone(),
        Duration::from_secs(config.feed.request_timeout_seconds),
    ));
    let endpoint: Arc<dyn MessagingEndpoint> = Arc::new(ConsoleEndpoint);
    let registry = SubscriptionRegistry::new();
    let users = UserStore::load_from(config_dir().join("users.json")).await;
    let pools = SamplingPools::new(source.clone());

    let generator = Arc::new(HttpGenerator::new(
        client,
        std::env::var("GENERATION_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_owned()),
        std::env::var("GENERATION_API_KEY").unwrap_or_default(),
    ));
    let assistant = Assistant::new(generator, AssistConfig::default());

    let owner = std::env::var("OWNER_ID")
        .ok()
        .and_then(|raw| raw.parse::<ConsumerId>().ok())
        .or(config.service.owner_id);

    let router = Arc::new(CommandRouter::new(
        source.clone(),
        pools,
        registry.clone(),
        users,
        endpoint.clone(),
        assistant,
        RouterConfig {
            latest_count: config.feed.latest_count,
            batch_size: config.feed.batch_size,
            owner,
        },
    ));

    let dispatcher = spawn_dispatcher(
        registry,
        source,
        endpoint,
        DispatchConfig {
            interval: Duration::from_secs(config.service.poll_interval_seconds),
        },
    );

    tokio::spawn(serve_liveness(config.service.listen_port));

    info!("newscast service started; reading commands from stdin");
    run_shell(router).await;

    if let Err(err) = dispatcher.stop().await {
        warn!(error = %err, "dispatcher did not stop cleanly");
    }
}

/// Reads `<consumer_id> <action...>` lines until stdin closes.
async fn run_shell(router: Arc<CommandRouter>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (id, action) = match line.split_once(' ') {
            Some((id, action)) => (id, action),
            None => {
                eprintln!("usage: <consumer_id> <action>");
                continue;
            }
        };
        match id.parse::<ConsumerId>() {
            Ok(consumer) => router.handle(consumer, action).await,
            Err(_) => eprintln!("invalid consumer id: {id}"),
        }
    }
}

async fn serve_liveness(port: u16) {
    let app = Router::new().route("/", get(|| async { "Bot is running!" }));
    let addr = format!("0.0.0.0:{port}");
    match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => {
            info!(%addr, "liveness endpoint listening");
            if let Err(err) = axum::serve(listener, app).await {
                warn!(error = %err, "liveness endpoint terminated");
            }
        }
        Err(err) => warn!(%addr, error = %err, "could not bind liveness endpoint"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn config_dir() -> PathBuf {
    let mut dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.push("newscast");
    dir
}
