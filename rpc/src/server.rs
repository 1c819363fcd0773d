//! Axum-based RPC server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use idlink_verification::SessionRegistry;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::info;

use crate::error::RpcError;
use crate::handlers;

/// Build the router over a shared registry.
pub fn router(registry: Arc<SessionRegistry>) -> Router {
    Router::new()
        .route("/", get(handlers::health))
        .route("/api/generate-code", post(handlers::generate_code))
        .route("/api/confirm", get(handlers::confirm))
        .route("/api/verify", post(handlers::verify))
        .route("/api/status", get(handlers::status))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(registry)
}

pub struct RpcServer {
    pub bind_address: SocketAddr,
    registry: Arc<SessionRegistry>,
}

impl RpcServer {
    pub fn new(bind_address: SocketAddr, registry: Arc<SessionRegistry>) -> Self {
        Self {
            bind_address,
            registry,
        }
    }

    /// Bind the listener. Separate from [`serve`](Self::serve) so a bind
    /// failure surfaces before the process reports itself ready.
    pub async fn bind(&self) -> Result<TcpListener, RpcError> {
        Ok(TcpListener::bind(self.bind_address).await?)
    }

    /// Serve on `listener` until `shutdown` resolves, then drain in-flight
    /// requests.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        info!(address = %local, "RPC server listening");
        axum::serve(listener, router(self.registry))
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("RPC server stopped");
        Ok(())
    }
}
