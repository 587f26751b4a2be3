pub mod health;
pub mod inspections;
pub mod premises;
pub mod visit_sheets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /premises                         list
/// /premises/import                  upsert sync-feed records (POST)
/// /premises/{premises_ref}          premises, actions and inspections
///
/// /inspections                      schedule an inspection (POST)
/// /inspections/due                  prioritised work-list with summary
/// /inspections/workload             workload summary
/// /inspections/{id}                 get
/// /inspections/{id}/complete        record results (PUT)
///
/// /visit-sheets                     batch for the due window
/// /visit-sheets/{premises_ref}      one premises
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/premises", premises::router())
        .nest("/inspections", inspections::router())
        .nest("/visit-sheets", visit_sheets::router())
}
