use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// Public pages call the API from the browser; admin calls carry a bearer
/// token, so no credentials are forwarded.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([header::CONTENT_DISPOSITION])
}
