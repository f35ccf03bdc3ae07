//! Route definitions for the `/entries` resource.

use axum::routing::get;
use axum::Router;

use crate::cors::{cors_headers, preflight};
use crate::handlers::entries;
use crate::state::AppState;

/// Routes mounted at `/entries`.
///
/// ```text
/// GET     /entries    -> list
/// OPTIONS /entries    -> preflight
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/entries", get(entries::list).options(preflight))
        .layer(cors_headers("GET, OPTIONS"))
}
