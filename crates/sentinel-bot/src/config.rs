//! Application configuration.
//!
//! Structure comes from a TOML file; secrets come from the environment so
//! they never land in a config file that might get committed.

use crate::error::{AppError, AppResult};
use sentinel_monitor::{OrderMonitorConfig, ResponderConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Marketplace connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllegroConfig {
    /// REST base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// OAuth base URL.
    #[serde(default = "default_auth_base")]
    pub auth_base: String,
    /// Redirect URI registered with the marketplace application.
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

fn default_api_base() -> String {
    "https://api.allegro.pl".to_string()
}

fn default_auth_base() -> String {
    "https://allegro.pl/auth/oauth".to_string()
}

fn default_redirect_uri() -> String {
    "http://localhost:8000".to_string()
}

impl Default for AllegroConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            auth_base: default_auth_base(),
            redirect_uri: default_redirect_uri(),
        }
    }
}

/// Discord REST settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default = "default_discord_api_base")]
    pub api_base: String,
}

fn default_discord_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            api_base: default_discord_api_base(),
        }
    }
}

/// Initial mode flags.
///
/// Only the monitor is configurable here: the responder always starts
/// inactive and safety always starts in test mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModesConfig {
    #[serde(default = "default_monitor_enabled")]
    pub monitor_enabled: bool,
}

fn default_monitor_enabled() -> bool {
    true
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            monitor_enabled: default_monitor_enabled(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub allegro: AllegroConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub modes: ModesConfig,
    pub monitor: OrderMonitorConfig,
    pub responder: ResponderConfig,
}

impl AppConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        if !Path::new(path).exists() {
            return Err(AppError::Config(format!("Config file not found: {path}")));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the loops cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.monitor.channel_id == 0 {
            return Err(AppError::Config(
                "monitor.channel_id must be a real channel id".to_string(),
            ));
        }
        if self.responder.channel_id == 0 {
            return Err(AppError::Config(
                "responder.channel_id must be a real channel id".to_string(),
            ));
        }
        if self.monitor.interval_secs == 0 || self.responder.interval_secs == 0 {
            return Err(AppError::Config(
                "loop intervals must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Secrets pulled from the environment.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub client_id: String,
    pub client_secret: String,
    pub bot_token: String,
    /// One-shot authorization code; when present the app exchanges it at
    /// startup instead of waiting for the operator.
    pub auth_code: Option<String>,
}

impl Secrets {
    /// Read `ALLEGRO_CLIENT_ID`, `ALLEGRO_CLIENT_SECRET`,
    /// `DISCORD_BOT_TOKEN` and optional `ALLEGRO_AUTH_CODE`.
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            client_id: require_env("ALLEGRO_CLIENT_ID")?,
            client_secret: require_env("ALLEGRO_CLIENT_SECRET")?,
            bot_token: require_env("DISCORD_BOT_TOKEN")?,
            auth_code: std::env::var("ALLEGRO_AUTH_CODE").ok(),
        })
    }
}

fn require_env(name: &str) -> AppResult<String> {
    std::env::var(name).map_err(|_| AppError::Config(format!("Missing env var: {name}")))
}
