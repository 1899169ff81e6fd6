#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use skilldrill_api::auth::jwt::{generate_access_token, JwtConfig};
use skilldrill_api::config::ServerConfig;
use skilldrill_api::router::build_app_router;
use skilldrill_api::state::AppState;
use skilldrill_core::catalog::DifficultyBand;
use skilldrill_core::config::PracticeConfig;
use skilldrill_db::models::practice_item::CreatePracticeItem;
use skilldrill_db::repositories::PracticeItemRepo;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
        practice: PracticeConfig::default(),
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A valid bearer token for `user_id` under [`test_config`].
pub fn token_for(user_id: i64) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::post(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Catalog fixtures
// ---------------------------------------------------------------------------

/// Tags that each resolve to exactly one placement skill.
pub const MAJOR_SKILL_TAGS: [&str; 6] = [
    "generative-ai",
    "agentic-ai",
    "coding",
    "communication",
    "logic",
    "creativity",
];

pub async fn create_item(
    pool: &PgPool,
    key: &str,
    tags: &[&str],
    band: DifficultyBand,
    difficulty: f64,
) -> i64 {
    let input = CreatePracticeItem {
        external_key: key.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        difficulty_band: band,
        difficulty,
        is_live: Some(true),
    };
    PracticeItemRepo::upsert(pool, &input)
        .await
        .expect("item creation should succeed")
        .id
}

/// Three foundation items per placement skill.
pub async fn seed_placement_catalog(pool: &PgPool) {
    for tag in MAJOR_SKILL_TAGS {
        for i in 0..3 {
            create_item(
                pool,
                &format!("{tag}-foundation-{i}"),
                &[tag],
                DifficultyBand::Foundation,
                1400.0,
            )
            .await;
        }
    }
}
