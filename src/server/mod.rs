//! HTTP server
//!
//! Wires the link store, identity provider and deletion pipeline into an
//! actix-web application and owns the worker pool's lifecycle.

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;
mod utils;


pub use builder::{ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::AppState;
