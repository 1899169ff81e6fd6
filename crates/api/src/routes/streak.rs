//! Route definitions for the `/streak` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::streak;
use crate::state::AppState;

/// Routes mounted at `/streak`.
///
/// ```text
/// GET    /          -> get_streak
/// POST   /repair    -> use_repair_token
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(streak::get_streak))
        .route("/repair", post(streak::use_repair_token))
}
