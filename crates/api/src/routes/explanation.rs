//! Route definitions for the `/explain` resource.

use axum::routing::post;
use axum::Router;

use crate::cors::{cors_headers, preflight};
use crate::handlers::explanation;
use crate::state::AppState;

/// Routes mounted at `/explain`.
///
/// ```text
/// POST    /explain    -> explain
/// OPTIONS /explain    -> preflight
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/explain", post(explanation::explain).options(preflight))
        .layer(cors_headers("POST, OPTIONS"))
}
