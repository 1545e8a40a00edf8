//! Configuration validators
//!
//! This module provides validation implementations for every section of the
//! service configuration.

use super::trait_def::Validate;
use crate::config::models::*;
use ipnet::IpNet;
use tracing::debug;

impl Validate for ShortenerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating service configuration");

        self.server.validate()?;
        self.deletion.validate()?;
        self.storage.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;

        debug!("Service configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if self.max_body_size == 0 {
            return Err("Max body size cannot be 0".to_string());
        }

        if let Some(base_url) = &self.base_url {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(format!(
                    "Base URL must use http:// or https:// scheme, got: {}",
                    base_url
                ));
            }
        }

        if self.workers == Some(0) {
            return Err("Server workers must be greater than 0".to_string());
        }

        if let Some(subnet) = &self.trusted_subnet {
            subnet
                .parse::<IpNet>()
                .map_err(|e| format!("Invalid trusted subnet {}: {}", subnet, e))?;
        }

        Ok(())
    }
}

impl Validate for DeletionConfig {
    fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Deletion workers must be greater than 0".to_string());
        }
        if self.buffer_size == 0 {
            return Err("Deletion queue buffer size must be greater than 0".to_string());
        }
        if self.chunk_size == 0 {
            return Err("Deletion chunk size must be greater than 0".to_string());
        }
        if self.lanes == 0 {
            return Err("Deletion lanes must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.file_path {
            if path.as_os_str().is_empty() {
                return Err("Storage file path cannot be empty".to_string());
            }
            if path.is_dir() {
                return Err(format!("Storage file path {} is a directory", path.display()));
            }
        }
        Ok(())
    }
}

impl Validate for AuthConfig {
    fn validate(&self) -> Result<(), String> {
        if self.cookie_name.is_empty() {
            return Err("Cookie name cannot be empty".to_string());
        }

        // Empty means "generate one at startup"
        if !self.cookie_secret.is_empty() && self.cookie_secret.len() < MIN_COOKIE_SECRET_LEN {
            return Err(format!(
                "Cookie secret must be at least {} bytes long",
                MIN_COOKIE_SECRET_LEN
            ));
        }

        if self.cookie_max_age <= 0 {
            return Err("Cookie max age must be positive".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
