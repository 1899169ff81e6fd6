//! Scheduler-level tests for how the review deck feeds daily drills.

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::create_item;
use skilldrill_api::engine::drill::{DrillScheduler, ItemAnswer};
use skilldrill_core::catalog::DifficultyBand;
use skilldrill_core::config::PracticeConfig;
use skilldrill_core::drill::DRILL_MAX_REVIEW_ITEMS;
use skilldrill_core::review::ReviewSchedule;
use skilldrill_core::types::{CalendarDay, Timestamp};
use skilldrill_db::repositories::ReviewDeckRepo;
use sqlx::PgPool;

const USER: i64 = 3003;

fn day_one() -> (CalendarDay, Timestamp) {
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
    (now.date_naive(), now)
}

fn miss(time_ms: i64) -> ItemAnswer {
    ItemAnswer {
        response: Some("wrong".to_string()),
        correct: false,
        time_ms,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missed_item_leads_next_days_drill(pool: PgPool) {
    let a = create_item(&pool, "gen-1", &["generative-ai"], DifficultyBand::Intermediate, 1500.0).await;
    let b = create_item(&pool, "gen-2", &["generative-ai"], DifficultyBand::Intermediate, 1500.0).await;
    let scheduler = DrillScheduler::new(pool.clone(), PracticeConfig::default());

    let (today, now) = day_one();
    let (drill, created) = scheduler.get_or_create_drill(USER, today, now).await.unwrap();
    assert!(created);
    let missed = drill.item_ids[1];
    scheduler
        .complete_item(USER, drill.id, missed, miss(2000), today, now)
        .await
        .unwrap();

    let entry = ReviewDeckRepo::find(&pool, USER, missed).await.unwrap().unwrap();
    assert_eq!(entry.interval_stage, 0);
    assert_eq!(entry.due_at, now + Duration::days(1));

    let tomorrow = now + Duration::days(1);
    let (next, created) = scheduler
        .get_or_create_drill(USER, tomorrow.date_naive(), tomorrow)
        .await
        .unwrap();
    assert!(created);
    assert_eq!(next.item_ids[0], missed);
    assert_eq!(next.item_ids.len(), 2);
    assert!(next.item_ids.contains(&a) && next.item_ids.contains(&b));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_review_items_are_capped_oldest_due_first(pool: PgPool) {
    let mut reviewed = Vec::new();
    for i in 0..4 {
        reviewed.push(
            create_item(&pool, &format!("code-{i}"), &["coding"], DifficultyBand::Intermediate, 1500.0)
                .await,
        );
    }
    let fresh = create_item(&pool, "gen-1", &["generative-ai"], DifficultyBand::Intermediate, 1500.0).await;

    // Staggered misses: the last reviewed item becomes due first.
    let schedule = ReviewSchedule::new(PracticeConfig::default().review_intervals_days);
    let (_, start) = day_one();
    for (offset, item_id) in reviewed.iter().rev().enumerate() {
        let at = start + Duration::minutes(offset as i64);
        ReviewDeckRepo::record_attempt(&pool, USER, *item_id, false, at, &schedule)
            .await
            .unwrap();
    }
    assert_eq!(ReviewDeckRepo::list_for_user(&pool, USER).await.unwrap().len(), 4);

    let scheduler = DrillScheduler::new(pool.clone(), PracticeConfig::default());
    let later = start + Duration::days(2);
    let (drill, _) = scheduler
        .get_or_create_drill(USER, later.date_naive(), later)
        .await
        .unwrap();

    let expected: Vec<i64> = reviewed.iter().rev().take(DRILL_MAX_REVIEW_ITEMS).copied().collect();
    assert_eq!(&drill.item_ids[..DRILL_MAX_REVIEW_ITEMS], expected.as_slice());
    assert!(!drill.item_ids.contains(&reviewed[0]));
    assert_eq!(&drill.item_ids[DRILL_MAX_REVIEW_ITEMS..], &[fresh]);
}
