pub mod entries;
pub mod explanation;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the public API route tree.
///
/// Route hierarchy:
///
/// ```text
/// /entries        GET list, OPTIONS preflight
/// /explain        POST explain, OPTIONS preflight
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(entries::router())
        .merge(explanation::router())
}
