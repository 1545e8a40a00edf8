//! Value types flowing through the deletion pipeline

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Opaque short-code naming a stored long URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortId(String);

impl ShortId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShortId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ShortId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque per-requester identity, supplied by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserToken(String);

impl UserToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// Bounded, ordered group of ids slated for one deletion task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub ids: Vec<ShortId>,
    pub user: UserToken,
}

impl Batch {
    pub fn new(ids: Vec<ShortId>, user: UserToken) -> Self {
        Self { ids, user }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Consume the batch into `(id, user)` pairs in input order
    pub fn into_pairs(self) -> impl Iterator<Item = (ShortId, UserToken)> {
        let user = self.user;
        self.ids.into_iter().map(move |id| (id, user.clone()))
    }
}

/// Ids verified as owned by the requesting user
pub type ConfirmedSet = HashSet<ShortId>;

/// Per-lane verdict for one `(id, user)` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipDecision {
    pub id: ShortId,
    pub owned: bool,
}
