//! shortener-rs - URL shortener with asynchronous bulk deletion

#![allow(missing_docs)]

use clap::Parser;
use shortener_rs::config::{CliArgs, Config};
use shortener_rs::server;
use shortener_rs::utils::logging::init_tracing;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match Config::load(&args).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.logging());

    let build = shortener_rs::build_info();
    info!(
        version = build.version,
        build_date = build.date,
        build_commit = build.commit,
        "Starting shortener"
    );

    match server::run_server(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server terminated with an error");
            // Display keeps the message readable when logging is JSON
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
