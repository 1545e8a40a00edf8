//! Storage layer for the shortener
//!
//! Link records live in a concurrent in-memory map, optionally backed by an
//! append-only file. The store doubles as the ownership oracle and the
//! bulk-deletion sink for the deletion pipeline.

/// Append-only link log
pub mod file;
/// In-memory link store
pub mod memory;

pub use file::{LinkLog, LogEntry};
pub use memory::{LinkRecord, LinkStats, MemoryStore};
