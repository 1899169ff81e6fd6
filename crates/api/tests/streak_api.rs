//! HTTP-level integration tests for streaks, ratings and health.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{body_json, get, get_auth, post_auth, token_for};
use skilldrill_core::streak::StreakState;
use skilldrill_db::repositories::StreakRepo;
use sqlx::PgPool;

const USER: i64 = 3003;

// ---------------------------------------------------------------------------
// Streak
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_streak_is_created_on_first_read(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/streak", &token_for(USER)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["current_streak"], 0);
    assert_eq!(json["data"]["repair_tokens"], 2);
    assert!(json["data"]["last_practice_date"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repair_covers_yesterday(pool: PgPool) {
    let today = Utc::now().date_naive();
    let state = StreakState {
        current_streak: 5,
        longest_streak: 5,
        last_practice_date: Some(today - Duration::days(2)),
        repair_tokens: 1,
        total_drills_completed: 5,
    };
    StreakRepo::overwrite(&pool, USER, &state).await.unwrap();

    let app = common::build_test_app(pool);
    let response = post_auth(app, "/api/v1/streak/repair", &token_for(USER)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let yesterday = (today - Duration::days(1)).to_string();
    assert_eq!(json["data"]["repair_tokens"], 0);
    assert_eq!(json["data"]["last_practice_date"], yesterday.as_str());
    assert_eq!(json["data"]["current_streak"], 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repair_without_tokens_is_rejected(pool: PgPool) {
    let today = Utc::now().date_naive();
    let state = StreakState {
        current_streak: 3,
        longest_streak: 3,
        last_practice_date: Some(today - Duration::days(2)),
        repair_tokens: 0,
        total_drills_completed: 3,
    };
    StreakRepo::overwrite(&pool, USER, &state).await.unwrap();

    let app = common::build_test_app(pool);
    let response = post_auth(app, "/api/v1/streak/repair", &token_for(USER)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "INSUFFICIENT_TOKENS");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_repair_with_nothing_to_cover_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_auth(app, "/api/v1/streak/repair", &token_for(USER)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ratings_cover_every_skill(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/ratings", &token_for(USER)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ratings = json["data"].as_array().unwrap();
    assert_eq!(ratings.len(), 11);
    assert_eq!(ratings[0]["skill"], "generative_ai");
    assert!(ratings.iter().all(|r| r["rating"] == 1500.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/ratings", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_check_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
