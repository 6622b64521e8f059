use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_SWEEP_SECS: u64 = 60 * 60;

/// Runtime settings, read once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    pub data_dir: PathBuf,
    pub admin_password_hash: String,
    pub sweep_interval: Duration,
}

impl Config {
    /// Load from the process environment, honouring a `.env` file if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let admin_password_hash = lookup("BLOG_ADMIN_PASSWORD_HASH")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BLOG_ADMIN_PASSWORD_HASH"))?;

        let sweep_secs = match lookup("BLOG_SESSION_SWEEP_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "BLOG_SESSION_SWEEP_SECS",
                    reason: format!("expected a positive number of seconds, got {raw:?}"),
                })?,
            None => DEFAULT_SWEEP_SECS,
        };

        Ok(Self {
            bind_addr: lookup("BLOG_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            data_dir: lookup("BLOG_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            admin_password_hash: admin_password_hash.trim().to_string(),
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}
