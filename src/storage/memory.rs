//! Concurrent in-memory link store with optional file persistence

use super::file::{LinkLog, LogEntry};
use crate::config::StorageConfig;
use crate::core::deletion::{ConfirmedSet, DeletionSink, OwnershipOracle, ShortId, UserToken};
use crate::utils::error::{Result, ShortenerError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

/// One stored short link
#[derive(Debug, Clone, Serialize)]
pub struct LinkRecord {
    pub short_id: ShortId,
    pub original_url: String,
    pub user: UserToken,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Totals reported by the internal statistics endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub urls: usize,
    pub users: usize,
}

/// Link store safe for concurrent use from every worker and lane
#[derive(Debug, Default)]
pub struct MemoryStore {
    links: DashMap<ShortId, LinkRecord>,
    log: Option<LinkLog>,
}

impl MemoryStore {
    /// Store that lives in memory only
    pub fn new() -> Self {
        Self::default()
    }

    /// Store persisted to the append-only log at `path`, replaying what is there
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let (log, entries) = LinkLog::open(path)?;
        let store = Self {
            links: DashMap::new(),
            log: None,
        };
        for entry in entries {
            store.apply(entry);
        }
        info!(links = store.len(), path = %log.path().display(), "Restored links");

        Ok(Self {
            log: Some(log),
            ..store
        })
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match &config.file_path {
            Some(path) => Self::open(path),
            None => Ok(Self::new()),
        }
    }

    /// Whether writes reach a file
    pub fn is_persistent(&self) -> bool {
        self.log.is_some()
    }

    /// Store a link; returns `Ok(false)` if the id is already taken
    pub fn insert(
        &self,
        short_id: ShortId,
        original_url: impl Into<String>,
        user: UserToken,
    ) -> Result<bool> {
        match self.links.entry(short_id.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                let record = LinkRecord {
                    short_id,
                    original_url: original_url.into(),
                    user,
                    is_deleted: false,
                    created_at: Utc::now(),
                };
                // Log first; a link that failed to persist is not stored
                if let Some(log) = &self.log {
                    log.append(&LogEntry::Created {
                        short_id: record.short_id.clone(),
                        original_url: record.original_url.clone(),
                        user: record.user.clone(),
                        created_at: record.created_at,
                    })?;
                }
                slot.insert(record);
                Ok(true)
            }
        }
    }


    /// Resolve a short id to its original URL
    pub fn get(&self, short_id: &ShortId) -> Result<String> {
        let record = self
            .links
            .get(short_id)
            .ok_or_else(|| ShortenerError::not_found(format!("short link {}", short_id)))?;
        if record.is_deleted {
            return Err(ShortenerError::gone(format!("short link {}", short_id)));
        }
        Ok(record.original_url.clone())
    }

    /// Live (not deleted) links created by `user`
    pub fn links_for(&self, user: &UserToken) -> Vec<LinkRecord> {
        let mut links: Vec<LinkRecord> = self
            .links
            .iter()
            .filter(|entry| &entry.user == user && !entry.is_deleted)
            .map(|entry| entry.value().clone())
            .collect();
        links.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        links
    }

    /// `Some(true)` when the link exists and is marked deleted
    pub fn is_deleted(&self, short_id: &ShortId) -> Option<bool> {
        self.links.get(short_id).map(|record| record.is_deleted)
    }

    /// Number of stored links and of distinct users who created them
    pub fn stats(&self) -> LinkStats {
        let users: HashSet<UserToken> = self
            .links
            .iter()
            .map(|entry| entry.user.clone())
            .collect();
        LinkStats {
            urls: self.links.len(),
            users: users.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl MemoryStore {
    fn apply(&self, entry: LogEntry) {
        match entry {
            LogEntry::Created {
                short_id,
                original_url,
                user,
                created_at,
            } => {
                self.links.entry(short_id.clone()).or_insert(LinkRecord {
                    short_id,
                    original_url,
                    user,
                    is_deleted: false,
                    created_at,
                });
            }
            LogEntry::Deleted { short_ids } => {
                for id in short_ids {
                    if let Some(mut record) = self.links.get_mut(&id) {
                        record.is_deleted = true;
                    }
                }
            }
        }
    }
}

#[async_trait]
impl OwnershipOracle for MemoryStore {
    async fn is_owner(&self, id: &ShortId, user: &UserToken) -> Result<bool> {
        Ok(self
            .links
            .get(id)
            .is_some_and(|record| &record.user == user))
    }
}

#[async_trait]
impl DeletionSink for MemoryStore {
    async fn mark_deleted(&self, ids: &ConfirmedSet) -> Result<()> {
        let mut marked = Vec::new();
        for id in ids {
            if let Some(mut record) = self.links.get_mut(id) {
                if !record.is_deleted {
                    record.is_deleted = true;
                    marked.push(id.clone());
                }
            }
        }
        debug!(requested = ids.len(), marked = marked.len(), "Marked links deleted");

        match &self.log {
            Some(log) if !marked.is_empty() => log.append(&LogEntry::Deleted { short_ids: marked }),
            _ => Ok(()),
        }
    }
}
