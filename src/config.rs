//! # Bot Configuration Module
//!
//! Runtime settings read from the process environment (optionally seeded
//! from a `.env` file by the binary).

use anyhow::{bail, Result};
use std::fmt;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://consumables.db";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuration structure for the bot process
#[derive(Clone)]
pub struct BotConfig {
    /// Telegram bot API token
    pub bot_token: String,
    /// SQLite connection URL
    pub database_url: String,
    pub log_format: LogFormat,
}

impl BotConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bot_token = match non_empty("TELEGRAM_BOT_TOKEN").or_else(|| non_empty("TOKEN")) {
            Some(token) => token,
            None => bail!("TELEGRAM_BOT_TOKEN must be set"),
        };

        let database_url =
            non_empty("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let log_format = match non_empty("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => bail!("Unsupported LOG_FORMAT: {other} (expected 'pretty' or 'json')"),
        };

        Ok(Self {
            bot_token,
            database_url,
            log_format,
        })
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("bot_token", &"<redacted>")
            .field("database_url", &self.database_url)
            .field("log_format", &self.log_format)
            .finish()
    }
}
