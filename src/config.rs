use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TWITTER_API_BASE: &str = "https://api.twitter.com";

/// Process-wide settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub twitter_bearer_token: String,
    pub twitter_api_base: String,
    pub bind_addr: String,
    pub menu_timeout: Duration,
    pub twitter_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_key = lookup("GEMINI_KEY").unwrap_or_else(|| {
            log::warn!("⚠️ GEMINI_KEY not set, menu extraction will fail upstream");
            String::new()
        });
        let twitter_bearer_token = lookup("TWITTER_BEARER_TOKEN").unwrap_or_else(|| {
            log::warn!("⚠️ TWITTER_BEARER_TOKEN not set, profile lookups will fail upstream");
            String::new()
        });

        Ok(Self {
            gemini_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: lookup("GEMINI_API_BASE")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            twitter_bearer_token,
            twitter_api_base: lookup("TWITTER_API_BASE")
                .unwrap_or_else(|| DEFAULT_TWITTER_API_BASE.to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            menu_timeout: Duration::from_secs(parse_or(&lookup, "MENU_TIMEOUT_SECS", 9)?),
            twitter_timeout: Duration::from_secs(parse_or(&lookup, "TWITTER_TIMEOUT_SECS", 10)?),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 20 * 1024 * 1024)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} must be a number, got {:?}", key, raw)),
        None => Ok(default),
    }
}
