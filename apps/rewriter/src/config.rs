use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4-turbo";

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_api_url: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub completion_max_attempts: u32,
    pub rate_limit_backoff: Duration,
    pub completion_timeout: Duration,
    pub fetch_timeout: Duration,
    /// Certificate verification for the completion API client. Only an
    /// explicit `TLS_VERIFY=false` turns it off.
    pub tls_verify: bool,
    pub preview_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let completion_max_attempts: u32 = parse_or(&lookup, "COMPLETION_MAX_ATTEMPTS", 3)?;
        if completion_max_attempts == 0 {
            anyhow::bail!("COMPLETION_MAX_ATTEMPTS must be at least 1");
        }

        Ok(Config {
            openai_api_key: require(&lookup, "OPENAI_API_KEY")?,
            openai_api_url: lookup("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            openai_max_tokens: parse_or(&lookup, "OPENAI_MAX_TOKENS", 2000)?,
            completion_max_attempts,
            rate_limit_backoff: Duration::from_secs(parse_or(
                &lookup,
                "RATE_LIMIT_BACKOFF_SECS",
                10,
            )?),
            completion_timeout: Duration::from_secs(parse_or(
                &lookup,
                "COMPLETION_TIMEOUT_SECS",
                120,
            )?),
            fetch_timeout: Duration::from_secs(parse_or(&lookup, "FETCH_TIMEOUT_SECS", 30)?),
            tls_verify: parse_or(&lookup, "TLS_VERIFY", true)?,
            preview_chars: parse_or(&lookup, "PREVIEW_CHARS", 1500)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
