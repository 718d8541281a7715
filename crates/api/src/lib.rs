//! HTTP surface of sitedesk: content API, leads, dashboard and page data.

pub mod audit;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

use crate::state::AppState;

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// The full application: routes plus tracing, CORS and body limit layers.
pub fn app(state: AppState) -> Router {
    routes::build_router(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::request_tracing::trace_layer())
                .layer(middleware::cors::cors_layer()),
        )
}
