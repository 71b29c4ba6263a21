//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

pub const RESTAURANTS_FILE: &str = "restaurants.json";
pub const GUESTBOOK_FILE: &str = "comments.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}' (expected text or json)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub public_dir: PathBuf,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3000")?,
            data_dir: try_load("DATA_DIR", "data")?,
            public_dir: try_load("PUBLIC_DIR", "public")?,
            log_format: try_load("LOG_FORMAT", "text")?,
        })
    }

    /// Config rooted at `data_dir`, everything else default. Used by tests.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            data_dir: data_dir.into(),
            public_dir: PathBuf::from("public"),
            log_format: LogFormat::Text,
        }
    }

    pub fn restaurants_path(&self) -> PathBuf {
        self.data_dir.join(RESTAURANTS_FILE)
    }

    pub fn guestbook_path(&self) -> PathBuf {
        self.data_dir.join(GUESTBOOK_FILE)
    }
}

/// Log format is needed before the subscriber exists, so it is read on its own.
pub fn log_format() -> LogFormat {
    env::var("LOG_FORMAT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(LogFormat::Text)
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse::<T>()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("invalid {key} value '{raw}'"))
}
