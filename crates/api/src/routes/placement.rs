//! Route definitions for the `/placement` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::placement;
use crate::state::AppState;

/// Routes mounted at `/placement`.
///
/// ```text
/// GET    /          -> get_placement
/// POST   /submit    -> submit_placement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(placement::get_placement))
        .route("/submit", post(placement::submit_placement))
}
