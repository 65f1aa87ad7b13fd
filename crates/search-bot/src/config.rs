//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use pagination::{PaginationConfig, ReaperConfig};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat platform configuration
    pub chat: ChatConfig,

    /// Page turning and affordance settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Idle session eviction
    #[serde(default)]
    pub reaper: ReaperConfig,

    /// Image search producer
    #[serde(default)]
    pub images: ImagesConfig,

    /// Steam store producer
    #[serde(default)]
    pub steam: SteamConfig,

    /// Bot configuration
    #[serde(default)]
    pub bot: BotConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Chat platform REST API endpoint
    #[serde(default = "default_chat_api")]
    pub api_url: String,

    /// Bot token
    pub token: SecretString,

    /// The bot's own user id, used to ignore its reactions
    pub bot_user_id: String,

    /// Poll interval for gateway events
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Brave Search API key; the producer is skipped without one
    pub api_key: Option<SecretString>,

    #[serde(default = "default_images_api")]
    pub base_url: String,

    #[serde(default = "default_image_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SteamConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_steam_api")]
    pub base_url: String,

    /// Storefront country code for prices
    #[serde(default = "default_country")]
    pub country: String,

    #[serde(default = "default_steam_results")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// File receiving warnings and errors
    #[serde(default = "default_error_log")]
    pub error_log: PathBuf,

    /// Channel that receives unexpected error reports
    #[serde(default)]
    pub operator_channel: Option<String>,
}

// Default implementations
impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            api_key: None,
            base_url: default_images_api(),
            max_results: default_image_results(),
        }
    }
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: default_steam_api(),
            country: default_country(),
            max_results: default_steam_results(),
        }
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            error_log: default_error_log(),
            operator_channel: None,
        }
    }
}

// Default value functions
fn default_chat_api() -> String {
    "http://chat-gateway:8080".into()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(200)
}

fn default_images_api() -> String {
    "https://api.search.brave.com".into()
}

fn default_steam_api() -> String {
    "https://store.steampowered.com".into()
}

fn default_country() -> String {
    "us".into()
}

fn default_image_results() -> usize {
    20
}

fn default_steam_results() -> usize {
    10
}

fn default_log_level() -> String {
    "info".into()
}

fn default_error_log() -> PathBuf {
    PathBuf::from("logs/errors.log")
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();
        Self::from_source(config::Environment::default())
    }

    fn from_source(source: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(source.separator("__").try_parsing(false))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
