//! Repository for the `placement_sessions` and `placement_results` tables.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use skilldrill_core::types::DbId;

use crate::models::placement::{CreatePlacementResult, PlacementResult, PlacementSession};

/// Column list for `placement_sessions` queries.
const SESSION_COLUMNS: &str = "user_id, item_ids, created_at";

/// Column list for `placement_results` queries.
const RESULT_COLUMNS: &str = "id, user_id, responses, initial_ratings, recommended_track, \
    ratings_seeded, completed_at";

/// Provides storage for generated placement tests and their results.
pub struct PlacementRepo;

impl PlacementRepo {
    /// Find the stored result for a user.
    pub async fn find_result(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<PlacementResult>, sqlx::Error> {
        let query = format!("SELECT {RESULT_COLUMNS} FROM placement_results WHERE user_id = $1");
        sqlx::query_as::<_, PlacementResult>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find the result inside the caller's transaction.
    pub async fn find_result_tx(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Option<PlacementResult>, sqlx::Error> {
        let query = format!("SELECT {RESULT_COLUMNS} FROM placement_results WHERE user_id = $1");
        sqlx::query_as::<_, PlacementResult>(&query)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Find the generated test for a user.
    pub async fn find_session(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<PlacementSession>, sqlx::Error> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM placement_sessions WHERE user_id = $1");
        sqlx::query_as::<_, PlacementSession>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Store a generated test unless one already exists, returning whichever
    /// session is stored. Concurrent first requests therefore agree on one
    /// item set.
    pub async fn create_session(
        pool: &PgPool,
        user_id: DbId,
        item_ids: &[DbId],
    ) -> Result<PlacementSession, sqlx::Error> {
        let mut tx = pool.begin().await?;
        sqlx::query(
            "INSERT INTO placement_sessions (user_id, item_ids) VALUES ($1, $2) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(item_ids)
        .execute(&mut *tx)
        .await?;

        let query = format!("SELECT {SESSION_COLUMNS} FROM placement_sessions WHERE user_id = $1");
        let session = sqlx::query_as::<_, PlacementSession>(&query)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(session)
    }

    /// Lock the user's session row for the rest of the transaction.
    pub async fn lock_session(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Option<PlacementSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM placement_sessions WHERE user_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, PlacementSession>(&query)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Insert the result inside the caller's transaction.
    pub async fn insert_result_tx(
        conn: &mut PgConnection,
        input: &CreatePlacementResult,
    ) -> Result<PlacementResult, sqlx::Error> {
        let query = format!(
            "INSERT INTO placement_results \
                 (user_id, responses, initial_ratings, recommended_track, ratings_seeded) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {RESULT_COLUMNS}"
        );
        sqlx::query_as::<_, PlacementResult>(&query)
            .bind(input.user_id)
            .bind(Json(&input.responses))
            .bind(Json(&input.initial_ratings))
            .bind(&input.recommended_track)
            .bind(input.ratings_seeded)
            .fetch_one(conn)
            .await
    }
}
