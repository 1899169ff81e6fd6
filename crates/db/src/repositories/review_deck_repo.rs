//! Repository for the `review_deck_entries` table (spaced-repetition queue).

use sqlx::{PgConnection, PgPool};
use skilldrill_core::review::ReviewSchedule;
use skilldrill_core::types::{DbId, Timestamp};

use crate::models::review::ReviewDeckEntry;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, item_id, due_at, interval_stage, attempt_count, \
    last_attempt_at, created_at, updated_at";

/// Provides due-item queries and attempt rescheduling.
pub struct ReviewDeckRepo;

impl ReviewDeckRepo {
    /// Item IDs due at or before `now`, oldest-due first, capped at `limit`.
    pub async fn due_items(
        pool: &PgPool,
        user_id: DbId,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT item_id FROM review_deck_entries \
             WHERE user_id = $1 AND due_at <= $2 \
             ORDER BY due_at ASC, item_id ASC \
             LIMIT $3",
        )
        .bind(user_id)
        .bind(now)
        .bind(limit.max(0))
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Find the entry for one item.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        item_id: DbId,
    ) -> Result<Option<ReviewDeckEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM review_deck_entries WHERE user_id = $1 AND item_id = $2"
        );
        sqlx::query_as::<_, ReviewDeckEntry>(&query)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(pool)
            .await
    }

    /// All entries for a user, soonest due first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ReviewDeckEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM review_deck_entries WHERE user_id = $1 ORDER BY due_at, item_id"
        );
        sqlx::query_as::<_, ReviewDeckEntry>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Upsert and reschedule an entry inside the caller's transaction.
    ///
    /// The existing row (if any) is locked before the next state is
    /// computed, so two simultaneous attempts on the same item apply one
    /// after the other.
    pub async fn record_attempt_tx(
        conn: &mut PgConnection,
        user_id: DbId,
        item_id: DbId,
        correct: bool,
        now: Timestamp,
        schedule: &ReviewSchedule,
    ) -> Result<ReviewDeckEntry, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM review_deck_entries \
             WHERE user_id = $1 AND item_id = $2 FOR UPDATE"
        );
        let existing = sqlx::query_as::<_, ReviewDeckEntry>(&query)
            .bind(user_id)
            .bind(item_id)
            .fetch_optional(&mut *conn)
            .await?;

        let next = schedule.next_state(existing.as_ref().map(ReviewDeckEntry::state), correct, now);

        // A concurrent first attempt may insert between the SELECT and here;
        // the conflict arm then re-applies the stage step on the locked row.
        let query = format!(
            "INSERT INTO review_deck_entries \
                 (user_id, item_id, due_at, interval_stage, attempt_count, last_attempt_at) \
             VALUES ($1, $2, $3, $4, 1, $5) \
             ON CONFLICT (user_id, item_id) DO UPDATE SET \
                 due_at = CASE WHEN $6 \
                     THEN GREATEST(review_deck_entries.due_at, EXCLUDED.due_at) \
                     ELSE EXCLUDED.due_at END, \
                 interval_stage = CASE WHEN $6 \
                     THEN LEAST(review_deck_entries.interval_stage + 1, $7) \
                     ELSE EXCLUDED.interval_stage END, \
                 attempt_count = review_deck_entries.attempt_count + 1, \
                 last_attempt_at = EXCLUDED.last_attempt_at, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        let entry = sqlx::query_as::<_, ReviewDeckEntry>(&query)
            .bind(user_id)
            .bind(item_id)
            .bind(next.due_at)
            .bind(next.interval_stage)
            .bind(now)
            .bind(correct)
            .bind(schedule.max_stage())
            .fetch_one(&mut *conn)
            .await?;

        tracing::debug!(
            user_id,
            item_id,
            correct,
            interval_stage = entry.interval_stage,
            due_at = %entry.due_at,
            "Review entry rescheduled",
        );
        Ok(entry)
    }

    /// Record an attempt in its own transaction.
    pub async fn record_attempt(
        pool: &PgPool,
        user_id: DbId,
        item_id: DbId,
        correct: bool,
        now: Timestamp,
        schedule: &ReviewSchedule,
    ) -> Result<ReviewDeckEntry, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let entry =
            Self::record_attempt_tx(&mut *tx, user_id, item_id, correct, now, schedule).await?;
        tx.commit().await?;
        Ok(entry)
    }
}
