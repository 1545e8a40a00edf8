//! Core shortener logic
//!
//! - **deletion**: the asynchronous bulk deletion pipeline
//! - **links**: short id derivation for new links

pub mod deletion;
pub mod links;
