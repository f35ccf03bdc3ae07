//! Handlers for the `/entries` resource.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, RawQuery, State};
use axum::Json;
use crosswordcoach_core::query::EntriesQuery;
use crosswordcoach_core::types::EntriesResponse;
use crosswordcoach_db::store::EntryRecord;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /entries
///
/// Validates the query parameters before the store is touched; validation and
/// store failures both come back as 400.
pub async fn list(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
    query: Result<Query<EntriesQuery>, QueryRejection>,
) -> AppResult<Json<EntriesResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let has_query_string = raw.is_some_and(|raw| !raw.is_empty());
    let options = EntriesQuery::parse_request(has_query_string.then_some(&query))?;

    let store = state.store.get().await?;
    let records = store.get_entries(&options).await?;

    tracing::debug!(
        page = options.page,
        page_size = options.page_size,
        count = records.len(),
        "Fetched entries"
    );

    Ok(Json(EntriesResponse {
        entries: records.into_iter().map(EntryRecord::into_entry).collect(),
    }))
}
