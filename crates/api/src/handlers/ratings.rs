//! Handlers for the `/ratings` resource.

use axum::extract::State;
use axum::Json;
use skilldrill_db::models::skill_rating::SkillRatingSummary;
use skilldrill_db::repositories::SkillRatingRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/ratings
///
/// One entry per skill; skills never practiced report the baseline.
pub async fn list_ratings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SkillRatingSummary>>>> {
    let summaries = SkillRatingRepo::summaries(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: summaries }))
}
