//! Repository for the `practice_items` table (item catalog projection).

use sqlx::PgPool;
use skilldrill_core::catalog::DifficultyBand;
use skilldrill_core::types::DbId;

use crate::models::practice_item::{CreatePracticeItem, PracticeItem};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, external_key, tags, difficulty_band, difficulty, is_live, created_at, updated_at";

/// Provides catalog lookups for placement and drill selection.
pub struct PracticeItemRepo;

impl PracticeItemRepo {
    /// Insert or refresh an item keyed by its external catalog key.
    pub async fn upsert(
        pool: &PgPool,
        input: &CreatePracticeItem,
    ) -> Result<PracticeItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO practice_items (external_key, tags, difficulty_band, difficulty, is_live) \
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE)) \
             ON CONFLICT (external_key) DO UPDATE SET \
                 tags = EXCLUDED.tags, \
                 difficulty_band = EXCLUDED.difficulty_band, \
                 difficulty = EXCLUDED.difficulty, \
                 is_live = EXCLUDED.is_live, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PracticeItem>(&query)
            .bind(&input.external_key)
            .bind(&input.tags)
            .bind(input.difficulty_band.as_str())
            .bind(input.difficulty)
            .bind(input.is_live)
            .fetch_one(pool)
            .await
    }

    /// Find an item by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PracticeItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM practice_items WHERE id = $1");
        sqlx::query_as::<_, PracticeItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several items at once, ordered by ID.
    pub async fn find_many(pool: &PgPool, ids: &[DbId]) -> Result<Vec<PracticeItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM practice_items WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, PracticeItem>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// All live items in a difficulty band.
    pub async fn list_live_by_band(
        pool: &PgPool,
        band: DifficultyBand,
    ) -> Result<Vec<PracticeItem>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM practice_items \
             WHERE is_live AND difficulty_band = $1 \
             ORDER BY id"
        );
        sqlx::query_as::<_, PracticeItem>(&query)
            .bind(band.as_str())
            .fetch_all(pool)
            .await
    }

    /// All live items, the candidate pool for new drill material.
    pub async fn list_live(pool: &PgPool) -> Result<Vec<PracticeItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM practice_items WHERE is_live ORDER BY id");
        sqlx::query_as::<_, PracticeItem>(&query)
            .fetch_all(pool)
            .await
    }
}
