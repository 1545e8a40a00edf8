//! Link persistence configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where short links are persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Append-only link log; links live in memory only when unset
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}
