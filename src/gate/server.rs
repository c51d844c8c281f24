//! Gateway HTTP server

use crate::gate::config::GatewayConfig;
use crate::gate::handlers::{self, GatewayState};
use crate::{CredentialResolver, Dispatcher, Registry};
use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span};

/// Build gateway state with the stock adapters for every provider
pub fn build_state(
    config: &GatewayConfig,
    credentials: CredentialResolver,
) -> crate::Result<GatewayState> {
    let registry = Registry::standard(credentials.clone(), |p| config.adapter_options(p))?;
    Ok(GatewayState {
        dispatcher: Arc::new(Dispatcher::new(registry)),
        credentials,
    })
}

/// Build the router; `/generate` mirrors `/ai/generate` for the browser client
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/ai/generate", get(handlers::generate_handler))
        .route("/generate", get(handlers::generate_handler))
        .route("/providers", get(handlers::list_providers))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                    info_span!(
                        "request",
                        id = %uuid::Uuid::new_v4(),
                        method = %req.method(),
                        path = req.uri().path(),
                    )
                }))
                .layer(middleware::from_fn(logging_middleware)),
        )
}

/// Start the gateway server
pub async fn start_server(config: GatewayConfig, credentials: CredentialResolver) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let app = build_router(build_state(&config, credentials)?);

    info!("Starting Gateway on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down Gateway");
}

/// Health check handler
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Logging middleware
async fn logging_middleware(req: Request, next: Next) -> axum::response::Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    // Path only: the query string carries caller input
    info!("{} {} {} {:?}", method, path, response.status(), start.elapsed());

    response
}
