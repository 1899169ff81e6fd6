//! Integration tests for the spaced-repetition review deck.

use chrono::{Duration, TimeZone, Utc};
use skilldrill_core::catalog::DifficultyBand;
use skilldrill_core::review::ReviewSchedule;
use skilldrill_core::types::Timestamp;
use skilldrill_db::models::practice_item::CreatePracticeItem;
use skilldrill_db::repositories::{PracticeItemRepo, ReviewDeckRepo};
use sqlx::PgPool;

const USER: i64 = 7;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
}

async fn seed_item(pool: &PgPool, key: &str) -> i64 {
    let input = CreatePracticeItem {
        external_key: key.to_string(),
        tags: vec!["coding".to_string()],
        difficulty_band: DifficultyBand::Foundation,
        difficulty: 1500.0,
        is_live: None,
    };
    PracticeItemRepo::upsert(pool, &input).await.unwrap().id
}

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_first_correct_attempt_lands_on_stage_one(pool: PgPool) {
    let item = seed_item(&pool, "q-1").await;
    let schedule = ReviewSchedule::default();

    let entry = ReviewDeckRepo::record_attempt(&pool, USER, item, true, t0(), &schedule)
        .await
        .unwrap();
    assert_eq!(entry.interval_stage, 1);
    assert_eq!(entry.due_at, t0() + Duration::days(3));
    assert_eq!(entry.attempt_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_incorrect_attempt_resets_stage(pool: PgPool) {
    let item = seed_item(&pool, "q-1").await;
    let schedule = ReviewSchedule::default();

    ReviewDeckRepo::record_attempt(&pool, USER, item, true, t0(), &schedule)
        .await
        .unwrap();
    let later = t0() + Duration::days(3);
    let entry = ReviewDeckRepo::record_attempt(&pool, USER, item, false, later, &schedule)
        .await
        .unwrap();

    assert_eq!(entry.interval_stage, 0);
    assert_eq!(entry.due_at, later + Duration::days(1));
    assert_eq!(entry.attempt_count, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_stage_caps_at_last_interval(pool: PgPool) {
    let item = seed_item(&pool, "q-1").await;
    let schedule = ReviewSchedule::default();

    let mut now = t0();
    let mut entry = None;
    for _ in 0..8 {
        let e = ReviewDeckRepo::record_attempt(&pool, USER, item, true, now, &schedule)
            .await
            .unwrap();
        now = e.due_at;
        entry = Some(e);
    }
    let entry = entry.unwrap();
    assert_eq!(entry.interval_stage, schedule.max_stage());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_early_correct_attempt_never_pulls_due_date_forward(pool: PgPool) {
    let item = seed_item(&pool, "q-1").await;
    let schedule = ReviewSchedule::new(vec![1, 30, 2]);

    let first = ReviewDeckRepo::record_attempt(&pool, USER, item, true, t0(), &schedule)
        .await
        .unwrap();
    let second = ReviewDeckRepo::record_attempt(&pool, USER, item, true, t0(), &schedule)
        .await
        .unwrap();
    assert_eq!(first.due_at, t0() + Duration::days(30));
    assert_eq!(second.interval_stage, 2);
    assert_eq!(second.due_at, first.due_at);
}

// ---------------------------------------------------------------------------
// Due queries
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_due_items_are_oldest_first_and_limited(pool: PgPool) {
    let schedule = ReviewSchedule::default();
    let a = seed_item(&pool, "q-a").await;
    let b = seed_item(&pool, "q-b").await;
    let c = seed_item(&pool, "q-c").await;

    // b is due one day after t0, a and c two days after.
    ReviewDeckRepo::record_attempt(&pool, USER, b, false, t0(), &schedule)
        .await
        .unwrap();
    let t1 = t0() + Duration::days(1);
    ReviewDeckRepo::record_attempt(&pool, USER, a, false, t1, &schedule)
        .await
        .unwrap();
    ReviewDeckRepo::record_attempt(&pool, USER, c, false, t1, &schedule)
        .await
        .unwrap();

    let now = t0() + Duration::days(5);
    let due = ReviewDeckRepo::due_items(&pool, USER, now, 2).await.unwrap();
    assert_eq!(due, vec![b, a]);

    let none_due = ReviewDeckRepo::due_items(&pool, USER, t0(), 10).await.unwrap();
    assert!(none_due.is_empty());

    let other_user = ReviewDeckRepo::due_items(&pool, USER + 1, now, 10).await.unwrap();
    assert!(other_user.is_empty());
}
