//! HTTP server for the Split Bot gateway

pub mod health;
pub mod middleware;
pub mod webhooks;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn;
use secrecy::SecretString;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::config::ServerConfig;
use crate::pipeline::Pipeline;

/// Shared state for API handlers
pub struct ApiState {
    pub pipeline: Arc<Pipeline>,
    /// Expected `X-Telegram-Bot-Api-Secret-Token`; `None` disables the check
    pub webhook_secret: Option<SecretString>,
}

/// HTTP server
pub struct ApiServer {
    state: Arc<ApiState>,
    host: String,
    port: u16,
}

impl ApiServer {
    /// Create a server that feeds webhook updates into `pipeline`
    #[must_use]
    pub fn new(
        pipeline: Arc<Pipeline>,
        webhook_secret: Option<SecretString>,
        server: &ServerConfig,
    ) -> Self {
        Self {
            state: Arc::new(ApiState {
                pipeline,
                webhook_secret,
            }),
            host: server.host.clone(),
            port: server.port,
        }
    }

    /// Build the router with all routes and layers
    #[must_use]
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .nest("/telegram", webhooks::router(self.state.clone()))
            .merge(health::router())
            .layer(from_fn(middleware::request_id))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until a shutdown signal arrives
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| crate::Error::Config(format!("failed to bind {addr}: {e}")))?;

        tracing::info!(%addr, "API server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| crate::Error::Config(format!("API server error: {e}")))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
