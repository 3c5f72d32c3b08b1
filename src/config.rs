use std::{env, fmt::Display, str::FromStr};

use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use tracing::Level;

use crate::payroll::aggregate::ReferenceDay;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Which day the dashboard reports on.
    pub reference_day: ReferenceDay,
    pub currency_symbol: String,
    pub log_level: Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            server_addr: required(&lookup, "SERVER_ADDR")?,
            database_url: required(&lookup, "DATABASE_URL")?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            access_token_ttl: parsed(&lookup, "ACCESS_TOKEN_TTL", 900)?, // 15 min

            rate_login_per_min: parsed(&lookup, "RATE_LOGIN_PER_MIN", 60)?,
            rate_protected_per_min: parsed(&lookup, "RATE_PROTECTED_PER_MIN", 1000)?,

            api_prefix: lookup("API_PREFIX").unwrap_or_else(|| "/api".to_string()),

            reference_day: parsed(&lookup, "DASHBOARD_REFERENCE_DAY", ReferenceDay::Latest)?,
            currency_symbol: lookup("CURRENCY_SYMBOL").unwrap_or_else(|| "₹".to_string()),
            log_level: parsed(&lookup, "LOG_LEVEL", Level::DEBUG)?,
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow!("{key} must be set"))
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
    }
}
