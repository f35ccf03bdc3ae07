//! Handlers for the `/explain` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use crosswordcoach_core::error::CoreError;
use crosswordcoach_core::types::{ExplanationRequest, ExplanationResponse};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Message returned when no explainer is configured.
pub const NOT_IMPLEMENTED_MESSAGE: &str = "This endpoint is not implemented yet.";

/// POST /explain
///
/// Returns the stored explanation when the entry has one. Otherwise asks the
/// configured explainer and stores the result on the entry. Storing is best
/// effort: a failure is logged and the explanation is still returned.
pub async fn explain(
    State(state): State<AppState>,
    input: Result<Json<ExplanationRequest>, JsonRejection>,
) -> AppResult<Json<ExplanationResponse>> {
    let Json(input) = input.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    input.validate().map_err(CoreError::from)?;

    let store = state.store.get().await?;
    if let Some(explanation) = store.find_explanation(&input.clue, &input.answer).await? {
        return Ok(Json(ExplanationResponse { explanation }));
    }

    let explainer = state
        .explainer
        .as_ref()
        .ok_or_else(|| AppError::NotImplemented(NOT_IMPLEMENTED_MESSAGE.to_string()))?;

    let explanation = explainer.explain(&input.clue, &input.answer).await?;

    match store
        .set_explanation(&input.clue, &input.answer, &explanation)
        .await
    {
        Ok(true) => tracing::debug!(clue = %input.clue, "Stored explanation"),
        Ok(false) => tracing::debug!(clue = %input.clue, "Explained an entry not in the store"),
        Err(e) => tracing::warn!(error = %e, clue = %input.clue, "Failed to store explanation"),
    }

    Ok(Json(ExplanationResponse { explanation }))
}
