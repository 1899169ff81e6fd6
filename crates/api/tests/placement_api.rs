//! HTTP-level integration tests for the placement test endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json_auth, seed_placement_catalog, token_for};
use serde_json::{json, Value};
use skilldrill_core::skills::Skill;
use skilldrill_db::repositories::SkillRatingRepo;
use sqlx::PgPool;

const USER: i64 = 1001;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch the pending test and return its items.
async fn fetch_items(pool: &PgPool, token: &str) -> Vec<Value> {
    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/placement", token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["completed"], false);
    json["data"]["items"].as_array().unwrap().clone()
}

/// Answer every item, marking correct only those tagged `correct_tag`.
fn answers(items: &[Value], correct_tag: Option<&str>) -> Value {
    let responses: Vec<Value> = items
        .iter()
        .map(|item| {
            let tag = item["tags"][0].as_str().unwrap();
            let correct = correct_tag.map_or(true, |t| t == tag);
            json!({
                "item_id": item["id"],
                "response": "A",
                "correct": correct,
                "response_time_ms": 4000,
            })
        })
        .collect();
    json!({ "responses": responses })
}

// ---------------------------------------------------------------------------
// Test generation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_placement_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/placement").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_placement_has_two_items_per_major_skill(pool: PgPool) {
    seed_placement_catalog(&pool).await;
    let token = token_for(USER);

    let items = fetch_items(&pool, &token).await;
    assert_eq!(items.len(), 12);
    for tag in common::MAJOR_SKILL_TAGS {
        let count = items.iter().filter(|i| i["tags"][0] == tag).count();
        assert_eq!(count, 2, "expected two items for {tag}");
    }

    // Asking again before submitting returns the same test.
    let again = fetch_items(&pool, &token).await;
    assert_eq!(items, again);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_placement_unavailable_with_thin_catalog(pool: PgPool) {
    common::create_item(
        &pool,
        "only-one",
        &["coding"],
        skilldrill_core::catalog::DifficultyBand::Foundation,
        1400.0,
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/placement", &token_for(USER)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_CONTENT");
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submit_scores_and_recommends_track(pool: PgPool) {
    seed_placement_catalog(&pool).await;
    let token = token_for(USER);
    let items = fetch_items(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/placement/submit", answers(&items, Some("coding")), &token)
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let result = &json["data"];
    assert_eq!(result["recommended_track"], "builder");
    assert_eq!(result["ratings_seeded"], true);
    assert_eq!(result["initial_ratings"]["coding"], 1700.0);
    assert_eq!(result["initial_ratings"]["logic"], 1300.0);
    assert_eq!(result["initial_ratings"]["planning"], 1500.0);

    let coding = SkillRatingRepo::get(&pool, USER, Skill::Coding).await.unwrap();
    assert_eq!(coding, 1700.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_submission_returns_stored_result(pool: PgPool) {
    seed_placement_catalog(&pool).await;
    let token = token_for(USER);
    let items = fetch_items(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let first = post_json_auth(app, "/api/v1/placement/submit", answers(&items, None), &token).await;
    assert_eq!(first.status(), StatusCode::CREATED);
    let first = body_json(first).await;

    // A different answer sheet must not re-seed.
    let app = common::build_test_app(pool.clone());
    let second = post_json_auth(
        app,
        "/api/v1/placement/submit",
        answers(&items, Some("nothing")),
        &token,
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;
    assert_eq!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(second["data"]["initial_ratings"]["coding"], 1700.0);

    let logic = SkillRatingRepo::get(&pool, USER, Skill::Logic).await.unwrap();
    assert_eq!(logic, 1700.0);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/placement", &token).await).await;
    assert_eq!(json["data"]["completed"], true);
    assert_eq!(json["data"]["result"]["id"], first["data"]["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_correct_ties_go_to_content_track(pool: PgPool) {
    seed_placement_catalog(&pool).await;
    let token = token_for(USER);
    let items = fetch_items(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response =
        post_json_auth(app, "/api/v1/placement/submit", answers(&items, None), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["recommended_track"], "content");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_with_wrong_count_is_rejected(pool: PgPool) {
    seed_placement_catalog(&pool).await;
    let token = token_for(USER);
    let items = fetch_items(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/placement/submit",
        answers(&items[..11], None),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_without_test_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/placement/submit",
        json!({ "responses": [] }),
        &token_for(USER),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_submission_after_practice_keeps_earned_ratings(pool: PgPool) {
    seed_placement_catalog(&pool).await;
    let token = token_for(USER);
    let items = fetch_items(&pool, &token).await;

    SkillRatingRepo::apply_attempt(&pool, USER, Skill::Coding, 1500.0, true, 32.0)
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/placement/submit", answers(&items, None), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["ratings_seeded"], false);

    let coding = SkillRatingRepo::get(&pool, USER, Skill::Coding).await.unwrap();
    assert!((coding - 1516.0).abs() < 1e-9);
}
