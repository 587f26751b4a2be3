//! Handlers for the `/visit-sheets` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use hygiene_core::visit_sheet::VisitSheet;
use serde::Serialize;

use crate::error::AppResult;
use crate::query::VisitSheetParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct VisitSheetBatch {
    pub count: usize,
    pub sheets: Vec<VisitSheet>,
}

/// GET /api/v1/visit-sheets/{premises_ref}
pub async fn generate(
    State(state): State<AppState>,
    Path(premises_ref): Path<String>,
    Query(params): Query<VisitSheetParams>,
) -> AppResult<impl IntoResponse> {
    let options = params.to_options()?;
    let sheet = state
        .visit_sheets
        .generate(&premises_ref, &options, Utc::now())
        .await?;
    Ok(Json(DataResponse { data: sheet }))
}

/// GET /api/v1/visit-sheets?months=6
///
/// One sheet per premises in the due window. Fails as a whole if any sheet
/// cannot be generated.
pub async fn batch(
    State(state): State<AppState>,
    Query(params): Query<VisitSheetParams>,
) -> AppResult<impl IntoResponse> {
    let options = params.to_options()?;
    let within_months = params.months.unwrap_or(state.config.default_within_months);
    let sheets = state
        .visit_sheets
        .generate_batch(within_months, &options, Utc::now())
        .await?;

    Ok(Json(DataResponse {
        data: VisitSheetBatch {
            count: sheets.len(),
            sheets,
        },
    }))
}
