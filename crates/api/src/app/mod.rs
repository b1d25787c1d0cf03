//! HTTP application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP handlers (form + listing, health and readiness)
//! - `dto.rs`: request bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::Router;
use tower::ServiceBuilder;

use formbook_infra::EntryStore;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// State shared by every handler.
///
/// The store is injected here once; handlers never reach for a global pool.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntryStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        Self { store }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(store: Arc<dyn EntryStore>) -> Router {
    let state = AppState::new(store);

    Router::new()
        .route("/health", axum::routing::get(routes::system::health))
        .route("/ready", axum::routing::get(routes::system::ready))
        .merge(routes::router())
        .fallback(routes::system::not_found)
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::trace_request)))
        .with_state(state)
}
