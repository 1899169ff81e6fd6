//! Repository for the `daily_drills` and `drill_item_attempts` tables.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use skilldrill_core::drill::DrillStatus;
use skilldrill_core::types::{CalendarDay, DbId, Timestamp};

use crate::models::drill::{CreateDrillItemAttempt, DailyDrill, DrillItemAttempt};

/// Column list for `daily_drills` queries.
const COLUMNS: &str = "id, user_id, drill_date, item_ids, completed_item_ids, status, \
    time_spent_ms, started_at, completed_at, created_at, updated_at";

/// Column list for `drill_item_attempts` queries.
const ATTEMPT_COLUMNS: &str =
    "id, drill_id, user_id, item_id, response, correct, time_ms, rating_changes, created_at";

/// Maximum history page size.
const MAX_HISTORY_LIMIT: i64 = 100;

/// Default history page size.
const DEFAULT_HISTORY_LIMIT: i64 = 30;

/// Clamp a requested history page size into `1..=MAX_HISTORY_LIMIT`.
pub fn clamp_history_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

/// Provides drill creation, locking, progress updates and history.
pub struct DrillRepo;

impl DrillRepo {
    /// The user's drill for `day`, if any.
    pub async fn find_for_day(
        pool: &PgPool,
        user_id: DbId,
        day: CalendarDay,
    ) -> Result<Option<DailyDrill>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM daily_drills WHERE user_id = $1 AND drill_date = $2");
        sqlx::query_as::<_, DailyDrill>(&query)
            .bind(user_id)
            .bind(day)
            .fetch_optional(pool)
            .await
    }

    /// Find a drill by ID, scoped to its owner.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<DailyDrill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM daily_drills WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, DailyDrill>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert the drill for `day` unless one exists.
    ///
    /// Returns the stored drill and whether this call created it. Two
    /// concurrent creations for the same day resolve to one row.
    pub async fn create_if_absent(
        pool: &PgPool,
        user_id: DbId,
        day: CalendarDay,
        item_ids: &[DbId],
    ) -> Result<(DailyDrill, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO daily_drills (user_id, drill_date, item_ids, status) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (user_id, drill_date) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, DailyDrill>(&query)
            .bind(user_id)
            .bind(day)
            .bind(item_ids)
            .bind(DrillStatus::Pending.as_str())
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(drill) => Ok((drill, true)),
            None => {
                let existing = Self::find_for_day(pool, user_id, day)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok((existing, false))
            }
        }
    }

    /// Lock a drill row for the rest of the transaction.
    pub async fn lock(
        conn: &mut PgConnection,
        user_id: DbId,
        id: DbId,
    ) -> Result<Option<DailyDrill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_drills WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        sqlx::query_as::<_, DailyDrill>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Append a completed item and advance status on a locked drill.
    ///
    /// `started_at` is stamped on the first completion; `completed_at` when
    /// `status` becomes completed.
    pub async fn mark_item_completed(
        conn: &mut PgConnection,
        id: DbId,
        item_id: DbId,
        time_ms: i64,
        status: DrillStatus,
        now: Timestamp,
    ) -> Result<DailyDrill, sqlx::Error> {
        let query = format!(
            "UPDATE daily_drills SET \
                 completed_item_ids = array_append(completed_item_ids, $2), \
                 time_spent_ms = time_spent_ms + $3, \
                 status = $4, \
                 started_at = COALESCE(started_at, $5), \
                 completed_at = CASE WHEN $4 = 'completed' THEN $5 ELSE completed_at END, \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DailyDrill>(&query)
            .bind(id)
            .bind(item_id)
            .bind(time_ms)
            .bind(status.as_str())
            .bind(now)
            .fetch_one(conn)
            .await
    }

    /// Log one item attempt.
    pub async fn insert_attempt(
        conn: &mut PgConnection,
        input: &CreateDrillItemAttempt,
    ) -> Result<DrillItemAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO drill_item_attempts \
                 (drill_id, user_id, item_id, response, correct, time_ms, rating_changes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {ATTEMPT_COLUMNS}"
        );
        sqlx::query_as::<_, DrillItemAttempt>(&query)
            .bind(input.drill_id)
            .bind(input.user_id)
            .bind(input.item_id)
            .bind(&input.response)
            .bind(input.correct)
            .bind(input.time_ms)
            .bind(Json(&input.rating_changes))
            .fetch_one(conn)
            .await
    }

    /// Attempts logged against a drill, in completion order.
    pub async fn list_attempts(
        pool: &PgPool,
        drill_id: DbId,
    ) -> Result<Vec<DrillItemAttempt>, sqlx::Error> {
        let query = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM drill_item_attempts WHERE drill_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, DrillItemAttempt>(&query)
            .bind(drill_id)
            .fetch_all(pool)
            .await
    }

    /// Most recent drills first.
    pub async fn list_history(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<DailyDrill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM daily_drills WHERE user_id = $1 \
             ORDER BY drill_date DESC LIMIT $2"
        );
        sqlx::query_as::<_, DailyDrill>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
