//! HTTP API server for the process registry.
//!
//! Provides CRUD endpoints over named process records, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use process_store::ProcessStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::models::AppState;

/// Creates the Axum application router with all routes and shared state.
///
/// The browser clients of this service are served from arbitrary origins, so
/// CORS is open to any origin, method, and header.
pub fn create_app<S: ProcessStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/api/models", post(routes::models::upsert::<S>))
        .route("/api/models", get(routes::models::get::<S>))
        .route("/api/models", delete(routes::models::delete::<S>))
        .route("/api/models/list", get(routes::models::list::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the shared application state around a store.
pub fn create_state<S: ProcessStore>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState { store })
}
