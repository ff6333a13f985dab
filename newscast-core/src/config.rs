use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub url: String,
    pub request_timeout_seconds: u64,
    /// Items shown by the "latest" command.
    pub latest_count: usize,
    /// Items per random draw.
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub poll_interval_seconds: u64,
    pub listen_port: u16,
    pub owner_id: Option<i64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: "https://www.animenewsnetwork.com/all/rss.xml".to_owned(),
            request_timeout_seconds: 15,
            latest_count: 10,
            batch_size: 5,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 120,
            listen_port: 8080,
            owner_id: None,
        }
    }
}

impl AppConfig {
    /// Loads the config file, falling back to (and writing) defaults when it
    /// is missing or unreadable.
    pub fn load(path: &Path) -> Self {
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("could not load config: {err}; using defaults");
                let config = Self::default();
                if let Err(save_err) = config.save(path) {
                    eprintln!("could not save default config: {save_err}");
                }
                config
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
