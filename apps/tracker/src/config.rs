use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::notify::toast::DEFAULT_TOAST_LIFETIME;
use crate::views::seeker::DEFAULT_POLL_INTERVAL;

/// Client configuration loaded from environment variables (and `.env`).
/// Every value has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub toast_lifetime: Duration,
    pub session_file: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let poll_secs = parse_secs(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL.as_secs())?;
        if poll_secs == 0 {
            bail!("POLL_INTERVAL_SECS must be greater than zero");
        }

        Ok(Config {
            api_base_url: lookup("API_BASE_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            poll_interval: Duration::from_secs(poll_secs),
            request_timeout: Duration::from_secs(parse_secs(&lookup, "REQUEST_TIMEOUT_SECS", 30)?),
            toast_lifetime: Duration::from_secs(parse_secs(
                &lookup,
                "TOAST_LIFETIME_SECS",
                DEFAULT_TOAST_LIFETIME.as_secs(),
            )?),
            session_file: lookup("SESSION_FILE")
                .unwrap_or_else(|| ".tracker-session.json".to_string())
                .into(),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{key} must be a whole number of seconds")),
        None => Ok(default),
    }
}
