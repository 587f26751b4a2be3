//! Route definitions for premises.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::premises;
use crate::state::AppState;

/// Routes mounted at `/premises`.
///
/// ```text
/// GET    /                  -> list
/// POST   /import            -> import
/// GET    /{premises_ref}    -> get_by_ref
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(premises::list))
        .route("/import", post(premises::import))
        .route("/{premises_ref}", get(premises::get_by_ref))
}
