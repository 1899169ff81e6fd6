//! Handlers for the `/streak` resource.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use skilldrill_db::models::streak::StreakRecord;
use skilldrill_db::repositories::StreakRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/streak
///
/// Creates the record with the starting repair tokens on first access.
pub async fn get_streak(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<StreakRecord>>> {
    let record = StreakRepo::get_or_create(
        &state.pool,
        user.user_id,
        state.config.practice.initial_repair_tokens,
    )
    .await?;
    Ok(Json(DataResponse { data: record }))
}

/// POST /api/v1/streak/repair
///
/// Spends one token to cover yesterday. 409 `INSUFFICIENT_TOKENS` with no
/// tokens left, 409 `CONFLICT` when there is no single missed day to cover.
pub async fn use_repair_token(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<StreakRecord>>> {
    let today = Utc::now().date_naive();
    let record =
        StreakRepo::use_repair_token(&state.pool, user.user_id, today, &state.config.practice)
            .await?;
    Ok(Json(DataResponse { data: record }))
}
