//! HTTP server core implementation

use crate::auth::CookieIdentity;
use crate::config::{Config, ServerConfig};
use crate::core::deletion::WorkerPool;
use crate::server::routes;
use crate::server::state::AppState;
use crate::server::utils::{format_bind_error, shutdown_signal};
use crate::storage::MemoryStore;
use crate::utils::error::{Result, ShortenerError};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{Compress, DefaultHeaders, Logger},
    web,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// JSON extractor settings: no content type required, errors become 400s
fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .content_type_required(false)
        .error_handler(|err, _req| {
            ShortenerError::bad_request(format!("Malformed request body: {}", err)).into()
        })
}

/// HTTP server together with the deletion worker pool it feeds
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
    pool: Arc<WorkerPool>,
    shutdown: CancellationToken,
}

impl HttpServer {
    /// Create a server backed by the store the configuration asks for
    pub fn new(config: &Config) -> Result<Self> {
        let store = MemoryStore::from_config(config.storage())?;
        Self::with_store(config, Arc::new(store))
    }

    pub fn with_store(config: &Config, store: Arc<MemoryStore>) -> Result<Self> {
        info!("Creating HTTP server");

        let deletion = config.deletion();
        let pool = Arc::new(WorkerPool::new(deletion.workers, deletion.buffer_size));
        let identity = Arc::new(CookieIdentity::from_config(config.auth()));
        let state = AppState::new(config.clone(), &pool, store, identity);

        Ok(Self {
            config: config.server().clone(),
            state,
            pool,
            shutdown: CancellationToken::new(),
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let max_body_size = state.config.server().max_body_size;

        App::new()
            .app_data(state)
            .app_data(web::PayloadConfig::new(max_body_size))
            .app_data(json_config(max_body_size))
            .wrap(Compress::default())
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "shortener-rs")))
            .configure(routes::health::configure_routes)
            .configure(routes::urls::configure_routes)
    }

    /// Serve until a shutdown signal arrives, then stop the worker pool.
    ///
    /// The pool runs on its own tokio task for the whole lifetime of the
    /// server. On Ctrl+C, SIGTERM or [`HttpServer::shutdown_token`] being
    /// cancelled, the pool stops taking new tasks and the HTTP server stops
    /// accepting connections.
    pub async fn start(self) -> Result<()> {
        let Self {
            config,
            state,
            pool,
            shutdown,
        } = self;

        let bind_addr = config.address();
        info!("Starting HTTP server on {}", bind_addr);

        let pool_task = {
            let pool = Arc::clone(&pool);
            let cancel = shutdown.clone();
            tokio::spawn(async move { pool.run(cancel).await })
        };

        let state = web::Data::new(state);
        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = config.workers {
            server = server.workers(workers);
        }
        let server = match server.bind(&bind_addr) {
            Ok(server) => server.disable_signals().run(),
            Err(e) => {
                shutdown.cancel();
                let _ = pool_task.await;
                return Err(format_bind_error(e, &bind_addr, config.port));
            }
        };

        let handle = server.handle();
        let signal_token = shutdown.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = shutdown_signal() => {}
                _ = signal_token.cancelled() => {}
            }
            signal_token.cancel();
            handle.stop(true).await;
        });

        info!("HTTP server listening on {}", bind_addr);
        let served = server.await;

        shutdown.cancel();
        if let Err(e) = pool_task.await {
            error!(error = %e, "Worker pool task failed");
        }

        let stats = pool.stats();
        info!(
            executed = stats.executed(),
            failed = stats.failed(),
            discarded = stats.discarded(),
            "HTTP server stopped"
        );

        served.map_err(|e| ShortenerError::server(format!("Server error: {}", e)))
    }

    /// Token that stops the server and the worker pool when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }
}
