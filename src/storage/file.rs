//! Append-only link log
//!
//! One JSON object per line. Creations and bulk deletions are appended as
//! they happen; replaying the file in order rebuilds the link table.

use crate::core::deletion::{ShortId, UserToken};
use crate::utils::error::{Result, ShortenerError};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A single line of the link log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LogEntry {
    Created {
        short_id: ShortId,
        original_url: String,
        user: UserToken,
        created_at: DateTime<Utc>,
    },
    Deleted {
        short_ids: Vec<ShortId>,
    },
}

/// Append handle on the link log file
#[derive(Debug)]
pub struct LinkLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl LinkLog {
    /// Open (creating if needed) the log at `path` and return its entries.
    ///
    /// Lines that do not parse are skipped with a warning.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<(Self, Vec<LogEntry>)> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                ShortenerError::storage(format!("Cannot create {}: {}", parent.display(), e))
            })?;
        }

        let entries = if path.exists() {
            read_entries(&path)?
        } else {
            Vec::new()
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ShortenerError::storage(format!("Cannot open {}: {}", path.display(), e)))?;

        info!(path = %path.display(), entries = entries.len(), "Opened link log");
        Ok((
            Self {
                path,
                file: Mutex::new(file),
            },
            entries,
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it to the file
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = self.file.lock();
        file.write_all(&line)
            .and_then(|_| file.flush())
            .map_err(|e| {
                ShortenerError::storage(format!("Cannot write {}: {}", self.path.display(), e))
            })
    }
}

fn read_entries(path: &Path) -> Result<Vec<LogEntry>> {
    let file = File::open(path)
        .map_err(|e| ShortenerError::storage(format!("Cannot read {}: {}", path.display(), e)))?;

    let mut entries = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!(line = number + 1, error = %e, "Skipping malformed link log line"),
        }
    }
    debug!(path = %path.display(), entries = entries.len(), "Read link log");
    Ok(entries)
}
