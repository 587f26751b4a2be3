//! Route definitions for scheduling and inspection records.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::inspections;
use crate::state::AppState;

/// Routes mounted at `/inspections`.
///
/// ```text
/// POST   /                  -> create
/// GET    /due               -> due
/// GET    /workload          -> workload
/// GET    /{id}              -> get_by_id
/// PUT    /{id}/complete     -> complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(inspections::create))
        .route("/due", get(inspections::due))
        .route("/workload", get(inspections::workload))
        .route("/{id}", get(inspections::get_by_id))
        .route("/{id}/complete", put(inspections::complete))
}
