//! Utility modules for the shortener
//!
//! - **error**: crate-wide error type and HTTP error responses
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{Result, ShortenerError};
pub use logging::init_tracing;
