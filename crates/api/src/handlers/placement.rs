//! Handlers for the `/placement` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use skilldrill_core::placement::PlacementResponse;
use skilldrill_db::models::placement::PlacementResult;

use crate::engine::placement::PlacementTest;
use crate::engine::PlacementEngine;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /placement/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitPlacementRequest {
    pub responses: Vec<PlacementResponse>,
}

/// GET /api/v1/placement
///
/// Returns `{completed: true, result}` once submitted, otherwise
/// `{completed: false, items}` with the user's 12 placement items.
pub async fn get_placement(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<PlacementTest>>> {
    let engine = PlacementEngine::new(state.pool.clone());
    let test = engine.get_or_create_test(user.user_id).await?;
    Ok(Json(DataResponse { data: test }))
}

/// POST /api/v1/placement/submit
///
/// 201 with the new result, or 200 with the stored result if the user has
/// already submitted.
pub async fn submit_placement(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SubmitPlacementRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PlacementResult>>)> {
    let engine = PlacementEngine::new(state.pool.clone());
    let submission = engine.submit(user.user_id, input.responses).await?;
    let status = if submission.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: submission.result,
        }),
    ))
}
