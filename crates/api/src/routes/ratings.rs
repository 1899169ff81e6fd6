use axum::routing::get;
use axum::Router;

use crate::handlers::ratings;
use crate::state::AppState;

/// Routes mounted at `/ratings`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(ratings::list_ratings))
}
