//! Integration tests for shortener-rs
//!
//! These tests drive the public API with real tokio tasks and channels.

pub mod config_tests;
pub mod deletion_pipeline_tests;
pub mod error_handling_tests;
