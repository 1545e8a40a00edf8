//! Common test utilities for shortener-rs
//!
//! - Test doubles for the ownership oracle and the deletion sink
//! - Link fixtures and polling helpers

pub mod fixtures;

pub use fixtures::{LinkFactory, ids, start_pool, wait_until};
pub use mocks::{CountingOracle, Gate, RecordingSink, ScriptedOracle};
