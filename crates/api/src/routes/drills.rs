//! Route definitions for the `/drills` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::drills;
use crate::state::AppState;

/// Routes mounted at `/drills`.
///
/// ```text
/// GET    /today                          -> get_today
/// POST   /today                          -> create_today
/// GET    /history                        -> history (?limit=)
/// POST   /{id}/items/{item_id}/complete  -> complete_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/today", get(drills::get_today).post(drills::create_today))
        .route("/history", get(drills::history))
        .route("/{id}/items/{item_id}/complete", post(drills::complete_item))
}
