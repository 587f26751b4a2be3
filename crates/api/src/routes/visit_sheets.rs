//! Route definitions for visit sheets.

use axum::routing::get;
use axum::Router;

use crate::handlers::visit_sheets;
use crate::state::AppState;

/// Routes mounted at `/visit-sheets`.
///
/// ```text
/// GET    /                  -> batch
/// GET    /{premises_ref}    -> generate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(visit_sheets::batch))
        .route("/{premises_ref}", get(visit_sheets::generate))
}
