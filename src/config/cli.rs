//! Command-line overrides

use super::models::ShortenerConfig;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments; every flag overrides file and environment values
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "shortener", version, about = "URL shortener service")]
pub struct CliArgs {
    /// Path to a YAML configuration file
    #[arg(short = 'c', long = "config", env = "SHORTENER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server address as host:port
    #[arg(short = 'a', long = "address")]
    pub address: Option<String>,

    /// Public base URL for short links
    #[arg(short = 'b', long = "base-url")]
    pub base_url: Option<String>,

    /// Append-only file the links are persisted to
    #[arg(short = 'f', long = "file-storage-path")]
    pub file_storage_path: Option<PathBuf>,

    /// CIDR allowed to read internal statistics
    #[arg(short = 't', long = "trusted-subnet")]
    pub trusted_subnet: Option<String>,

    /// Number of deletion workers
    #[arg(short = 'w', long = "workers")]
    pub workers: Option<usize>,

    /// Deletion task queue buffer size
    #[arg(long = "wb")]
    pub workers_buffer: Option<usize>,

    /// Ownership-check lanes per deletion batch
    #[arg(long = "lanes")]
    pub lanes: Option<usize>,

    /// Emit JSON logs
    #[arg(long = "json-logs")]
    pub json_logs: bool,
}

impl CliArgs {
    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, config: &mut ShortenerConfig) -> Result<()> {
        if let Some(address) = &self.address {
            config.server.set_address(address)?;
        }
        if let Some(base_url) = &self.base_url {
            config.server.base_url = Some(base_url.clone());
        }
        if let Some(path) = &self.file_storage_path {
            config.storage.file_path = Some(path.clone());
        }
        if let Some(subnet) = &self.trusted_subnet {
            config.server.trusted_subnet = Some(subnet.clone());
        }
        if let Some(workers) = self.workers {
            config.deletion.workers = workers;
        }
        if let Some(buffer) = self.workers_buffer {
            config.deletion.buffer_size = buffer;
        }
        if let Some(lanes) = self.lanes {
            config.deletion.lanes = lanes;
        }
        if self.json_logs {
            config.logging.json = true;
        }
        Ok(())
    }
}
