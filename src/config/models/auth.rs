//! Identity cookie configuration

use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Minimum accepted cookie secret length in bytes
pub const MIN_COOKIE_SECRET_LEN: usize = 16;

/// Identity cookie configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Name of the cookie carrying the encrypted user id
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Secret the cookie key is derived from; generated at startup when empty
    #[serde(default)]
    pub cookie_secret: String,
    /// Cookie lifetime in seconds
    #[serde(default = "default_cookie_max_age")]
    pub cookie_max_age: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            cookie_secret: String::new(),
            cookie_max_age: default_cookie_max_age(),
        }
    }
}

impl AuthConfig {
    /// The configured secret, or a random one when none is set
    pub fn effective_secret(&self) -> String {
        if self.cookie_secret.is_empty() {
            warn!("No cookie secret configured; identities will not survive a restart");
            return generate_cookie_secret();
        }
        self.cookie_secret.clone()
    }
}

fn default_cookie_name() -> String {
    "userId".to_string()
}

fn default_cookie_max_age() -> i64 {
    864_000 // 10 days
}

fn generate_cookie_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}
