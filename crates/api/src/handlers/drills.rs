//! Handlers for the `/drills` resource.
//!
//! "Today" is the current UTC calendar date.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use skilldrill_core::error::CoreError;
use skilldrill_core::types::DbId;
use skilldrill_db::models::drill::DailyDrill;
use skilldrill_db::repositories::drill_repo::clamp_history_limit;

use crate::engine::drill::{ItemAnswer, ItemCompletion};
use crate::engine::DrillScheduler;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for completing a drill item.
#[derive(Debug, Deserialize)]
pub struct CompleteItemRequest {
    #[serde(default)]
    pub response: Option<String>,
    pub correct: bool,
    pub time_ms: i64,
}

fn scheduler(state: &AppState) -> DrillScheduler {
    DrillScheduler::new(state.pool.clone(), state.config.practice.clone())
}

/// GET /api/v1/drills/today
pub async fn get_today(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<DailyDrill>>> {
    let today = Utc::now().date_naive();
    let drill = scheduler(&state)
        .get_todays_drill(user.user_id, today)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "DailyDrill",
                id: user.user_id,
            })
        })?;
    Ok(Json(DataResponse { data: drill }))
}

/// POST /api/v1/drills/today
///
/// 201 when the drill was assembled by this call, 200 when it already
/// existed.
pub async fn create_today(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<(StatusCode, Json<DataResponse<DailyDrill>>)> {
    let now = Utc::now();
    let (drill, created) = scheduler(&state)
        .get_or_create_drill(user.user_id, now.date_naive(), now)
        .await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: drill })))
}

/// POST /api/v1/drills/{id}/items/{item_id}/complete
pub async fn complete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path((drill_id, item_id)): Path<(DbId, DbId)>,
    Json(input): Json<CompleteItemRequest>,
) -> AppResult<Json<DataResponse<ItemCompletion>>> {
    let now = Utc::now();
    let answer = ItemAnswer {
        response: input.response,
        correct: input.correct,
        time_ms: input.time_ms,
    };
    let completion = scheduler(&state)
        .complete_item(user.user_id, drill_id, item_id, answer, now.date_naive(), now)
        .await?;
    Ok(Json(DataResponse { data: completion }))
}

/// GET /api/v1/drills/history?limit=
///
/// Newest first; `limit` defaults to 30 and is clamped to 1..=100.
pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<DailyDrill>>>> {
    let limit = clamp_history_limit(params.limit);
    let drills = scheduler(&state).history(user.user_id, limit).await?;
    Ok(Json(DataResponse { data: drills }))
}
