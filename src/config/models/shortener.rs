//! Top-level service configuration

use super::*;
use crate::utils::error::{Result, ShortenerError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Main service configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ShortenerConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Bulk deletion pipeline configuration
    #[serde(default)]
    pub deletion: DeletionConfig,
    /// Link persistence configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Identity cookie configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShortenerConfig {
    /// Overlay values from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary variable lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Applying environment overrides");

        if let Some(address) = lookup("SERVER_ADDRESS") {
            self.server.set_address(&address)?;
        }
        if let Some(base_url) = lookup("BASE_URL") {
            self.server.base_url = Some(base_url);
        }
        if let Some(subnet) = lookup("TRUSTED_SUBNET") {
            self.server.trusted_subnet = Some(subnet);
        }
        if let Some(path) = lookup("FILE_STORAGE_PATH") {
            self.storage.file_path = Some(path.into());
        }
        if let Some(workers) = parse_var(&lookup, "NUMBER_OF_WORKERS")? {
            self.deletion.workers = workers;
        }
        if let Some(buffer) = parse_var(&lookup, "WORKERS_BUFFER")? {
            self.deletion.buffer_size = buffer;
        }
        if let Some(chunk) = parse_var(&lookup, "DELETE_CHUNK_SIZE")? {
            self.deletion.chunk_size = chunk;
        }
        if let Some(lanes) = parse_var(&lookup, "DELETE_LANES")? {
            self.deletion.lanes = lanes;
        }
        if let Some(secret) = lookup("COOKIE_SECRET") {
            self.auth.cookie_secret = secret;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ShortenerError::config(format!("Invalid {}: {}", key, e))),
        None => Ok(None),
    }
}
