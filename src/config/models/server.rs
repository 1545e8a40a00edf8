//! Server configuration

use super::*;
use crate::utils::error::{Result, ShortenerError};
use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Public prefix for short links; derived from host and port when unset
    #[serde(default)]
    pub base_url: Option<String>,
    /// CIDR allowed to read `/api/internal/stats`; the endpoint is closed when unset
    #[serde(default)]
    pub trusted_subnet: Option<String>,
    /// Number of HTTP worker threads
    pub workers: Option<usize>,
    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            trusted_subnet: None,
            workers: None,
            max_body_size: default_max_body_size(),
        }
    }
}

impl ServerConfig {
    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Set host and port from a `host:port` string
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        let (host, port) = address.rsplit_once(':').ok_or_else(|| {
            ShortenerError::config(format!("Server address must be host:port, got {}", address))
        })?;
        self.port = port
            .parse()
            .map_err(|e| ShortenerError::config(format!("Invalid port in {}: {}", address, e)))?;
        self.host = host.to_string();
        Ok(())
    }

    /// Public base URL, always ending with `/`
    pub fn base_url(&self) -> String {
        let mut base = self
            .base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}/", self.address()));
        if !base.ends_with('/') {
            base.push('/');
        }
        base
    }
}
