//! Signal handling and bind error reporting

use crate::utils::error::ShortenerError;
use tracing::{info, warn};

/// Resolves on Ctrl+C or SIGTERM
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal, shutting down gracefully"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down gracefully");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Turn a bind failure into an error message that suggests a fix
pub(crate) fn format_bind_error(error: std::io::Error, bind_addr: &str, port: u16) -> ShortenerError {
    let error_str = error.to_string();

    if error.kind() == std::io::ErrorKind::AddrInUse
        || error_str.contains("Address already in use")
        || error_str.contains("os error 48")
        || error_str.contains("os error 98")
    {
        ShortenerError::server(format!(
            "Port {} is already in use. Stop the other process (lsof -ti:{} | xargs kill) \
             or pick another address with -a {}:{}",
            port,
            port,
            bind_addr.rsplit_once(':').map_or("localhost", |(host, _)| host),
            port.saturating_add(1)
        ))
    } else if error.kind() == std::io::ErrorKind::PermissionDenied
        || error_str.contains("os error 13")
    {
        ShortenerError::server(format!(
            "Permission denied for port {}. Use a port >= 1024, e.g. -a localhost:8080",
            port
        ))
    } else {
        ShortenerError::server(format!("Failed to bind to {}: {}", bind_addr, error))
    }
}
