use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::{env, str::FromStr, time::Duration};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    /// Lifetime of issued tokens, in seconds.
    pub token_ttl: usize,
    /// Upper bound for every storage call and pool acquire.
    pub storage_timeout_ms: u64,

    // Rate limiting
    pub rate_signin_per_min: u32,
    pub rate_signup_per_min: u32,

    pub log_dir: String,
}

fn required(key: &str) -> Result<String> {
    require(key, env::var(key).ok())
}

fn or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_or(key, env::var(key).ok(), default)
}

fn require(key: &str, raw: Option<String>) -> Result<String> {
    raw.with_context(|| format!("{key} must be set"))
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: or_default("SERVER_ADDR", "0.0.0.0:8080".to_string())?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            token_ttl: or_default("TOKEN_TTL", 3600)?, // default 1 hour
            storage_timeout_ms: or_default("STORAGE_TIMEOUT_MS", 5000)?,

            rate_signin_per_min: or_default("RATE_SIGNIN_PER_MIN", 60)?,
            rate_signup_per_min: or_default("RATE_SIGNUP_PER_MIN", 30)?,

            log_dir: or_default("LOG_DIR", "logs".to_string())?,
        })
    }

    pub fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}
