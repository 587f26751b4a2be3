//! Handlers for scheduling and the `/inspections` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use hygiene_core::error::CoreError;
use hygiene_core::inspection::{InspectionOutcome, NewInspection};
use hygiene_core::scheduling::{summarise_workload, ScheduledInspection, WorkloadSummary};
use hygiene_core::types::DbId;
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::query::WithinMonthsParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Prioritised work-list with its summary.
#[derive(Debug, Serialize)]
pub struct DueInspections {
    pub within_months: u32,
    pub summary: WorkloadSummary,
    pub inspections: Vec<ScheduledInspection>,
}

fn inspection_not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "Inspection",
        reference: id.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// GET /api/v1/inspections/due?months=6
pub async fn due(
    State(state): State<AppState>,
    Query(params): Query<WithinMonthsParams>,
) -> AppResult<impl IntoResponse> {
    let within_months = params.resolve(state.config.default_within_months);
    let inspections = state
        .scheduler
        .scheduled_inspections(within_months, Utc::now())
        .await?;

    Ok(Json(DataResponse {
        data: DueInspections {
            within_months,
            summary: summarise_workload(&inspections),
            inspections,
        },
    }))
}

/// GET /api/v1/inspections/workload?months=6
pub async fn workload(
    State(state): State<AppState>,
    Query(params): Query<WithinMonthsParams>,
) -> AppResult<impl IntoResponse> {
    let within_months = params.resolve(state.config.default_within_months);
    let summary = state
        .scheduler
        .workload_summary(within_months, Utc::now())
        .await?;
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// POST /api/v1/inspections
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewInspection>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;
    let inspection = state.records.create_inspection(input, Utc::now()).await?;

    tracing::info!(
        id = inspection.id,
        reference_number = %inspection.reference_number,
        premises_ref = %inspection.premises_ref,
        "Scheduled inspection"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: inspection })))
}

/// GET /api/v1/inspections/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let inspection = state
        .records
        .get_inspection(id)
        .await?
        .ok_or_else(|| inspection_not_found(id))?;
    Ok(Json(DataResponse { data: inspection }))
}

/// PUT /api/v1/inspections/{id}/complete
pub async fn complete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(outcome): Json<InspectionOutcome>,
) -> AppResult<impl IntoResponse> {
    outcome.validate()?;
    let inspection = state
        .records
        .complete_inspection(id, &outcome, Utc::now())
        .await?;

    tracing::info!(
        id,
        total_score = ?inspection.total_score,
        fhrs_rating = ?inspection.fhrs_rating,
        "Completed inspection"
    );
    Ok(Json(DataResponse { data: inspection }))
}
