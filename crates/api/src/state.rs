use std::sync::Arc;

use crosswordcoach_db::handle::StoreHandle;

use crate::explainer::Explainer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Lazily connected entry store.
    pub store: Arc<StoreHandle>,
    /// Explanation generator; `None` when not configured.
    pub explainer: Option<Arc<dyn Explainer>>,}
