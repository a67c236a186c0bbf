//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string (optional; orders are kept in memory without it)
//! - `NATS_URL` - NATS server for customer notifications (optional; notices are only logged without it)
//! - `PORT` - Listen port (default: 8083)
//! - `NOTIFY_SUBJECT` - NATS subject for progress notices (default: `boutique.orders.progress`)
//! - `PROGRESS_POLICY` - `permissive` or `monotonic` (default: permissive)
//! - `PROGRESS_KEY_LANGUAGE` - `en`, `fr` or `ar`; language of color names in unit keys (default: fr)
//! - `COLOR_CACHE_CAPACITY` - resolved colors kept in memory (default: 512)

use std::str::FromStr;

use thiserror::Error;

use crate::color::DEFAULT_CACHE_CAPACITY;
use crate::domain::value_objects::Language;
use crate::progress::ProgressPolicy;

const DEFAULT_PORT: u16 = 8083;
const DEFAULT_NOTIFY_SUBJECT: &str = "boutique.orders.progress";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: Option<String>,
    pub nats_url: Option<String>,
    pub port: u16,
    pub notify_subject: String,
    pub progress_policy: ProgressPolicy,
    pub key_language: Language,
    pub color_cache_capacity: u64,
}

impl Config {
    /// Load from the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        Ok(Self {
            database_url: var("DATABASE_URL"),
            nats_url: var("NATS_URL"),
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            notify_subject: var("NOTIFY_SUBJECT").unwrap_or_else(|| DEFAULT_NOTIFY_SUBJECT.to_string()),
            progress_policy: parse_or("PROGRESS_POLICY", var("PROGRESS_POLICY"), ProgressPolicy::default())?,
            key_language: parse_or("PROGRESS_KEY_LANGUAGE", var("PROGRESS_KEY_LANGUAGE"), Language::default())?,
            color_cache_capacity: parse_or("COLOR_CACHE_CAPACITY", var("COLOR_CACHE_CAPACITY"), DEFAULT_CACHE_CAPACITY)?,
        })
    }
}

fn parse_or<T>(name: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_string(), e.to_string())),
        None => Ok(default),
    }
}
