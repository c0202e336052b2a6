use std::time::Duration;

use anyhow::{Context, Result};

use crate::cache::DEFAULT_TTL;

/// Default lifetime of an issued session token.
const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// `None` switches every generation task onto the mock path.
    pub gemini_api_key: Option<String>,
    pub jwt: JwtConfig,
    pub cache_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

/// Session token signing parameters.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub session_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            jwt: JwtConfig {
                secret: require_env("JWT_SECRET")?,
                session_ttl_hours: parse_env("SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS)?,
            },
            cache_ttl: Duration::from_secs(parse_env("CACHE_TTL_SECS", DEFAULT_TTL.as_secs())?),
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads an optional variable; blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
