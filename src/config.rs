//! Configuration management
//!
//! Everything comes from the environment (plus an optional `.env` file
//! loaded by `main`); there are no CLI flags. Variables use the `DIGEST_`
//! prefix with `__` separating nesting levels, e.g.
//! `DIGEST_TELEGRAM__BOT_TOKEN`, `DIGEST_FEED__NITTER_INSTANCE`.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Delivery credentials; required.
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Coin Metrics community API base URL.
    #[serde(default = "default_metrics_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Nitter mirror serving the alert account's RSS.
    #[serde(default = "default_nitter_instance")]
    pub nitter_instance: String,
    /// Account publishing large-transfer alerts.
    #[serde(default = "default_feed_account")]
    pub account: String,
    /// Recency window for alert lines, in hours.
    #[serde(default = "default_window_hours")]
    pub window_hours: i64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_metrics_base_url() -> String {
    "https://api.coinmetrics.io/v4".to_string()
}

fn default_nitter_instance() -> String {
    "https://nitter.net".to_string()
}

fn default_feed_account() -> String {
    "whale_alert".to_string()
}

fn default_window_hours() -> i64 {
    24
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            base_url: default_metrics_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            nitter_instance: default_nitter_instance(),
            account: default_feed_account(),
            window_hours: default_window_hours(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix("DIGEST").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }
}
