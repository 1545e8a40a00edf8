//! Configuration data models
//!
//! This module defines all configuration structures used throughout the service.

pub mod auth;
pub mod deletion;
pub mod logging;
pub mod server;
pub mod shortener;
pub mod storage;

// Re-export all configuration types
pub use auth::*;
pub use deletion::*;
pub use logging::*;
pub use server::*;
pub use shortener::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "localhost".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}
