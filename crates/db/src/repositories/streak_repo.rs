//! Repository for the `streak_records` table (the streak tracker).

use sqlx::{PgConnection, PgPool};
use skilldrill_core::config::PracticeConfig;
use skilldrill_core::streak::{StreakOutcome, StreakState};
use skilldrill_core::types::{CalendarDay, DbId};

use crate::error::RepoError;
use crate::models::streak::StreakRecord;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "user_id, current_streak, longest_streak, last_practice_date, \
    repair_tokens, total_drills_completed, created_at, updated_at";

/// Provides lazy creation, completion accounting and token repair.
pub struct StreakRepo;

impl StreakRepo {
    /// Find a user's streak record without creating it.
    pub async fn find(pool: &PgPool, user_id: DbId) -> Result<Option<StreakRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM streak_records WHERE user_id = $1");
        sqlx::query_as::<_, StreakRecord>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Return the user's record, creating it with the starting tokens if absent.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
        initial_repair_tokens: i32,
    ) -> Result<StreakRecord, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::materialize(&mut *conn, user_id, initial_repair_tokens).await?;
        let query = format!("SELECT {COLUMNS} FROM streak_records WHERE user_id = $1");
        sqlx::query_as::<_, StreakRecord>(&query)
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await
    }

    async fn materialize(
        conn: &mut PgConnection,
        user_id: DbId,
        initial_repair_tokens: i32,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO streak_records (user_id, repair_tokens) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(initial_repair_tokens)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Create-if-absent then lock the row for the rest of the transaction.
    async fn lock(
        conn: &mut PgConnection,
        user_id: DbId,
        initial_repair_tokens: i32,
    ) -> Result<StreakRecord, sqlx::Error> {
        Self::materialize(&mut *conn, user_id, initial_repair_tokens).await?;
        let query = format!("SELECT {COLUMNS} FROM streak_records WHERE user_id = $1 FOR UPDATE");
        sqlx::query_as::<_, StreakRecord>(&query)
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await
    }

    async fn write(
        conn: &mut PgConnection,
        user_id: DbId,
        state: &StreakState,
    ) -> Result<StreakRecord, sqlx::Error> {
        let query = format!(
            "UPDATE streak_records SET \
                 current_streak = $2, \
                 longest_streak = $3, \
                 last_practice_date = $4, \
                 repair_tokens = $5, \
                 total_drills_completed = $6, \
                 updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StreakRecord>(&query)
            .bind(user_id)
            .bind(state.current_streak)
            .bind(state.longest_streak)
            .bind(state.last_practice_date)
            .bind(state.repair_tokens)
            .bind(state.total_drills_completed)
            .fetch_one(conn)
            .await
    }

    /// Count a completed drill on `today` inside the caller's transaction.
    ///
    /// Idempotent per day: a second completion on the same day leaves the
    /// record untouched.
    pub async fn record_completion_tx(
        conn: &mut PgConnection,
        user_id: DbId,
        today: CalendarDay,
        config: &PracticeConfig,
    ) -> Result<(StreakRecord, StreakOutcome), sqlx::Error> {
        let current = Self::lock(&mut *conn, user_id, config.initial_repair_tokens).await?;
        let (next, outcome) = current.state().record_completion(today, config);
        if outcome == StreakOutcome::AlreadyCounted {
            return Ok((current, outcome));
        }

        let record = Self::write(&mut *conn, user_id, &next).await?;
        tracing::info!(
            user_id,
            ?outcome,
            current_streak = record.current_streak,
            repair_tokens = record.repair_tokens,
            "Streak updated",
        );
        Ok((record, outcome))
    }

    /// Count a completed drill in its own transaction.
    pub async fn record_completion(
        pool: &PgPool,
        user_id: DbId,
        today: CalendarDay,
        config: &PracticeConfig,
    ) -> Result<(StreakRecord, StreakOutcome), sqlx::Error> {
        let mut tx = pool.begin().await?;
        let result = Self::record_completion_tx(&mut *tx, user_id, today, config).await?;
        tx.commit().await?;
        Ok(result)
    }

    /// Spend a repair token to bridge yesterday's missed practice.
    pub async fn use_repair_token(
        pool: &PgPool,
        user_id: DbId,
        today: CalendarDay,
        config: &PracticeConfig,
    ) -> Result<StreakRecord, RepoError> {
        let mut tx = pool.begin().await?;
        let current = Self::lock(&mut *tx, user_id, config.initial_repair_tokens).await?;
        let next = current.state().use_repair_token(today)?;
        let record = Self::write(&mut *tx, user_id, &next).await?;
        tx.commit().await?;

        tracing::info!(
            user_id,
            repair_tokens = record.repair_tokens,
            last_practice_date = ?record.last_practice_date,
            "Repair token used",
        );
        Ok(record)
    }

    /// Overwrite a user's streak counters, e.g. when importing history.
    pub async fn overwrite(
        pool: &PgPool,
        user_id: DbId,
        state: &StreakState,
    ) -> Result<StreakRecord, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock(&mut *tx, user_id, state.repair_tokens).await?;
        let record = Self::write(&mut *tx, user_id, state).await?;
        tx.commit().await?;
        Ok(record)
    }
}
