//! Router assembly and server startup.
//!
//! One flat route table over [`AppState`], wrapped in trace, CORS, and
//! timeout middleware. Handlers stay in `routes/`; this module only wires
//! them together and binds the listener.

use crate::config::GatewayConfig;
use crate::routes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use std::sync::Arc;
use swap_engine::SwapApi;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Shared handler state: the engine behind its inbound port.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn SwapApi>,
}

impl AppState {
    pub fn new(api: Arc<dyn SwapApi>) -> Self {
        Self { api }
    }
}

/// Assemble the full route table with middleware applied.
pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(config.request_timeout));

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/slots",
            get(routes::slots::list_slots).post(routes::slots::create_slot),
        )
        .route("/api/slots/stats", get(routes::slots::slot_stats))
        .route(
            "/api/slots/:id",
            get(routes::slots::get_slot)
                .put(routes::slots::update_slot)
                .delete(routes::slots::delete_slot),
        )
        .route(
            "/api/slots/:id/swappable",
            patch(routes::slots::toggle_swappable),
        )
        .route(
            "/api/swaps/swappable-slots",
            get(routes::swaps::swappable_slots),
        )
        .route("/api/swaps/requests", post(routes::swaps::propose))
        .route(
            "/api/swaps/requests/:id",
            get(routes::swaps::get_request).delete(routes::swaps::cancel),
        )
        .route(
            "/api/swaps/requests/:id/response",
            post(routes::swaps::respond),
        )
        .route("/api/swaps/my-requests", get(routes::swaps::my_requests))
        .route("/api/swaps/stats", get(routes::swaps::swap_stats))
        .fallback(unknown_route)
        .layer(middleware)
        .with_state(state)
}

/// Bind the configured address and serve until the process stops.
pub async fn serve(config: &GatewayConfig, state: AppState) -> std::io::Result<()> {
    let router = build_router(state, config);
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "gateway listening");
    axum::serve(listener, router).await
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "swap-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn unknown_route() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Route not found" })),
    )
}
