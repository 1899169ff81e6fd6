pub mod drills;
pub mod health;
pub mod placement;
pub mod ratings;
pub mod streak;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route requires `Authorization: Bearer <jwt>`.
///
/// ```text
/// /placement                                       get or create test (GET)
/// /placement/submit                                submit responses (POST)
///
/// /drills/today                                    today's drill (GET), get or create (POST)
/// /drills/{id}/items/{item_id}/complete            complete one item (POST)
/// /drills/history                                  past drills, newest first (GET)
///
/// /streak                                          streak record (GET)
/// /streak/repair                                   spend a repair token (POST)
///
/// /ratings                                         per-skill ratings (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/placement", placement::router())
        .nest("/drills", drills::router())
        .nest("/streak", streak::router())
        .nest("/ratings", ratings::router())
}
