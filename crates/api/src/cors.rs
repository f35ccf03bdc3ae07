//! Per-route CORS headers and preflight handling.
//!
//! Every response from a CORS-enabled route carries an `*` origin, the
//! methods that route accepts, and `Content-Type` as the allowed header.
//! `OPTIONS` requests are answered before any request parsing happens.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, StatusCode};
use tower::layer::util::{Identity, Stack};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;

type HeaderLayer = SetResponseHeaderLayer<HeaderValue>;

/// Layer stack adding the three CORS response headers.
pub type CorsHeadersLayer = Stack<HeaderLayer, Stack<HeaderLayer, Stack<HeaderLayer, Identity>>>;

/// Build the CORS header layer for a route accepting `methods`
/// (e.g. `"GET, OPTIONS"`).
pub fn cors_headers(methods: &'static str) -> ServiceBuilder<CorsHeadersLayer> {
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(methods),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
}

/// OPTIONS handler: `204 No Content` with an empty body.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}
