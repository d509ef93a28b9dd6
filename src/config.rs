//! # Configuration
//!
//! Environment-driven configuration, read once at startup. Required
//! variables fail fast with context; numeric variables fall back to
//! defaults only when unset, never when malformed.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_REFRESH_SECS: u64 = 300;
const DEFAULT_SESSION_TTL_SECS: u64 = 12 * 60 * 60;
const DEFAULT_KEEPALIVE_PORT: u16 = 8080;
const DEFAULT_MANAGER_HANDLE: &str = "@manager";

/// Runtime configuration for the bot process.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token.
    pub bot_token: String,
    /// URL of the JSON catalog document.
    pub products_url: String,
    /// Drive file id of the menu header image, if any.
    pub menu_image_file_id: Option<String>,
    /// Handle shown in the ordering instructions.
    pub manager_handle: String,
    /// Period between catalog refresh attempts.
    pub refresh_period: Duration,
    /// Idle time after which a session is evicted.
    pub session_ttl: Duration,
    /// Port of the keep-alive HTTP endpoint.
    pub keepalive_port: u16,
}

impl BotConfig {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let products_url =
            env::var("PRODUCTS_JSON_URL").context("PRODUCTS_JSON_URL must be set")?;
        let menu_image_file_id = env::var("MENU_IMAGE_FILE_ID")
            .ok()
            .filter(|value| !value.is_empty());
        let manager_handle =
            env::var("MANAGER_HANDLE").unwrap_or_else(|_| DEFAULT_MANAGER_HANDLE.to_string());

        Ok(Self {
            bot_token,
            products_url,
            menu_image_file_id,
            manager_handle,
            refresh_period: Duration::from_secs(parse_var(
                "CATALOG_REFRESH_SECS",
                DEFAULT_REFRESH_SECS,
            )?),
            session_ttl: Duration::from_secs(parse_var(
                "SESSION_TTL_SECS",
                DEFAULT_SESSION_TTL_SECS,
            )?),
            keepalive_port: parse_var("PORT", DEFAULT_KEEPALIVE_PORT)?,
        })
    }
}

/// Parse a numeric variable, falling back to `default` only when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a number, got {value:?}")),
        Err(_) => Ok(default),
    }
}
