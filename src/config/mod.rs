//! Configuration management for the shortener
//!
//! Sources, lowest precedence first: built-in defaults, a YAML file,
//! environment variables, command-line flags.

pub mod cli;
pub mod models;
pub mod validation;

pub use cli::CliArgs;
pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, ShortenerError};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the service
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Service configuration
    pub gateway: ShortenerConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ShortenerError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let gateway: ShortenerConfig = serde_yaml::from_str(content)
            .map_err(|e| ShortenerError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { gateway };
        config.validate()?;
        Ok(config)
    }

    /// Resolve the full configuration: `.env`, file, environment, then flags
    pub async fn load(args: &CliArgs) -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {:?}", path);
        }

        let mut config = match &args.config {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.gateway.apply_env()?;
        args.apply(&mut config.gateway)?;

        config.validate()?;
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    /// Get deletion pipeline configuration
    pub fn deletion(&self) -> &DeletionConfig {
        &self.gateway.deletion
    }

    /// Get auth configuration
    pub fn auth(&self) -> &AuthConfig {
        &self.gateway.auth
    }

    /// Get storage configuration
    pub fn storage(&self) -> &StorageConfig {
        &self.gateway.storage
    }

    /// Get logging configuration
    pub fn logging(&self) -> &LoggingConfig {
        &self.gateway.logging
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.gateway
            .validate()
            .map_err(|e| ShortenerError::Config(format!("Invalid configuration: {}", e)))
    }
}
