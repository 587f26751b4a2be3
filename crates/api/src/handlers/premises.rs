//! Handlers for the `/premises` resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use hygiene_core::error::CoreError;
use hygiene_core::inspection::Inspection;
use hygiene_core::premises::{EnforcementAction, Premises};
use hygiene_core::sync::{ImportSummary, NormalizedPremises, PremisesFeedRecord};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// A premises with its enforcement and inspection history.
#[derive(Debug, Serialize)]
pub struct PremisesDetail {
    #[serde(flatten)]
    pub premises: Premises,
    pub previous_actions: Vec<EnforcementAction>,
    pub inspections: Vec<Inspection>,
}

/// GET /api/v1/premises
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let premises = state.store.get_all_premises().await?;
    Ok(Json(DataResponse { data: premises }))
}

/// GET /api/v1/premises/{premises_ref}
pub async fn get_by_ref(
    State(state): State<AppState>,
    Path(premises_ref): Path<String>,
) -> AppResult<impl IntoResponse> {
    let premises = state
        .store
        .get_premises(&premises_ref)
        .await?
        .ok_or_else(|| CoreError::premises_not_found(&premises_ref))?;

    let (previous_actions, inspections) = tokio::try_join!(
        state.store.get_previous_actions(&premises_ref),
        state.store.get_inspections_for_premises(&premises_ref),
    )?;

    Ok(Json(DataResponse {
        data: PremisesDetail {
            premises,
            previous_actions,
            inspections,
        },
    }))
}

/// POST /api/v1/premises/import
///
/// Upsert sync-feed records. Every record is normalised before anything is
/// written, so one invalid record rejects the whole request.
pub async fn import(
    State(state): State<AppState>,
    Json(records): Json<Vec<PremisesFeedRecord>>,
) -> AppResult<impl IntoResponse> {
    let normalized = records
        .into_iter()
        .map(PremisesFeedRecord::normalize)
        .collect::<Result<Vec<_>, _>>()?;

    let mut summary = ImportSummary::default();
    for NormalizedPremises { premises, actions } in normalized {
        summary.imported += 1;
        summary.actions += actions.len();
        state.records.upsert_premises(premises, actions).await?;
    }

    tracing::info!(
        imported = summary.imported,
        actions = summary.actions,
        "Imported premises from sync feed"
    );
    Ok(Json(DataResponse { data: summary }))
}
