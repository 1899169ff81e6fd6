//! Repository for the `skill_ratings` table (the rating store).
//!
//! Every mutation is a read-modify-write under a row lock: the row is first
//! materialized with `INSERT ... ON CONFLICT DO NOTHING`, then locked with
//! `SELECT ... FOR UPDATE`, so concurrent attempts on the same
//! `(user_id, skill)` serialize instead of losing updates.

use std::collections::BTreeMap;

use sqlx::{PgConnection, PgPool};
use skilldrill_core::elo::{self, BASELINE_RATING};
use skilldrill_core::error::CoreError;
use skilldrill_core::skills::Skill;
use skilldrill_core::types::DbId;

use crate::error::RepoError;
use crate::models::skill_rating::{RatingChange, SkillRating, SkillRatingSummary};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, skill, rating, attempt_count, created_at, updated_at";

/// Provides rating reads, attempt updates and placement seeding.
pub struct SkillRatingRepo;

impl SkillRatingRepo {
    /// Current rating for one skill, baseline if the user has none yet.
    pub async fn get(pool: &PgPool, user_id: DbId, skill: Skill) -> Result<f64, sqlx::Error> {
        let row: Option<(f64,)> =
            sqlx::query_as("SELECT rating FROM skill_ratings WHERE user_id = $1 AND skill = $2")
                .bind(user_id)
                .bind(skill.as_str())
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(rating,)| rating).unwrap_or(BASELINE_RATING))
    }

    /// All stored rating rows for a user, ordered by skill.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SkillRating>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skill_ratings WHERE user_id = $1 ORDER BY skill");
        sqlx::query_as::<_, SkillRating>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Ratings for every skill, baseline-filled where no row exists.
    pub async fn ratings_map(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<BTreeMap<Skill, f64>, sqlx::Error> {
        let summaries = Self::summaries(pool, user_id).await?;
        Ok(summaries.into_iter().map(|s| (s.skill, s.rating)).collect())
    }

    /// One summary per skill in declaration order.
    pub async fn summaries(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SkillRatingSummary>, sqlx::Error> {
        let rows = Self::list_for_user(pool, user_id).await?;
        let summaries = Skill::ALL
            .into_iter()
            .map(|skill| match rows.iter().find(|r| r.skill == skill.as_str()) {
                Some(row) => SkillRatingSummary {
                    skill,
                    rating: row.rating,
                    attempt_count: row.attempt_count,
                    updated_at: Some(row.updated_at),
                },
                None => SkillRatingSummary {
                    skill,
                    rating: BASELINE_RATING,
                    attempt_count: 0,
                    updated_at: None,
                },
            })
            .collect();
        Ok(summaries)
    }

    /// Whether the user has any recorded practice attempt.
    pub async fn has_attempts(conn: &mut PgConnection, user_id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM skill_ratings WHERE user_id = $1 AND attempt_count > 0)",
        )
        .bind(user_id)
        .fetch_one(conn)
        .await?;
        Ok(row.0)
    }

    /// Apply one attempt inside the caller's transaction.
    pub async fn apply_attempt_tx(
        conn: &mut PgConnection,
        user_id: DbId,
        skill: Skill,
        item_difficulty: f64,
        correct: bool,
        k_factor: f64,
    ) -> Result<RatingChange, RepoError> {
        sqlx::query(
            "INSERT INTO skill_ratings (user_id, skill, rating) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, skill) DO NOTHING",
        )
        .bind(user_id)
        .bind(skill.as_str())
        .bind(BASELINE_RATING)
        .execute(&mut *conn)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM skill_ratings WHERE user_id = $1 AND skill = $2 FOR UPDATE"
        );
        let current = sqlx::query_as::<_, SkillRating>(&query)
            .bind(user_id)
            .bind(skill.as_str())
            .fetch_one(&mut *conn)
            .await?;

        elo::validate_rating_inputs(current.rating, item_difficulty)?;
        let rating = elo::update_rating(current.rating, item_difficulty, correct, k_factor);

        sqlx::query(
            "UPDATE skill_ratings SET rating = $2, attempt_count = attempt_count + 1, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(current.id)
        .bind(rating)
        .execute(&mut *conn)
        .await?;

        Ok(RatingChange {
            skill,
            previous: current.rating,
            rating,
        })
    }

    /// Apply one attempt in its own transaction.
    pub async fn apply_attempt(
        pool: &PgPool,
        user_id: DbId,
        skill: Skill,
        item_difficulty: f64,
        correct: bool,
        k_factor: f64,
    ) -> Result<RatingChange, RepoError> {
        let mut tx = pool.begin().await?;
        let change =
            Self::apply_attempt_tx(&mut *tx, user_id, skill, item_difficulty, correct, k_factor)
                .await?;
        tx.commit().await?;
        Ok(change)
    }

    /// Overwrite ratings with placement results inside the caller's
    /// transaction.
    ///
    /// Locks every rating row of the user first. Rejected with `Conflict`
    /// when any practice attempt has already been recorded so earned
    /// progress is never replaced.
    pub async fn seed_tx(
        conn: &mut PgConnection,
        user_id: DbId,
        ratings: &BTreeMap<Skill, f64>,
    ) -> Result<(), RepoError> {
        let skills: Vec<String> = ratings.keys().map(|s| s.as_str().to_string()).collect();
        let values: Vec<f64> = ratings.values().copied().collect();
        if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v < elo::RATING_FLOOR) {
            return Err(CoreError::Validation(format!("Invalid seed rating {bad}")).into());
        }

        sqlx::query(
            "INSERT INTO skill_ratings (user_id, skill, rating) \
             SELECT $1, s, $3 FROM UNNEST($2::text[]) AS s \
             ON CONFLICT (user_id, skill) DO NOTHING",
        )
        .bind(user_id)
        .bind(&skills)
        .bind(BASELINE_RATING)
        .execute(&mut *conn)
        .await?;

        sqlx::query("SELECT id FROM skill_ratings WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        if Self::has_attempts(&mut *conn, user_id).await? {
            return Err(CoreError::Conflict(
                "Ratings already reflect practice attempts and cannot be re-seeded".to_string(),
            )
            .into());
        }

        sqlx::query(
            "UPDATE skill_ratings AS r SET rating = v.rating, updated_at = NOW() \
             FROM UNNEST($2::text[], $3::float8[]) AS v(skill, rating) \
             WHERE r.user_id = $1 AND r.skill = v.skill",
        )
        .bind(user_id)
        .bind(&skills)
        .bind(&values)
        .execute(&mut *conn)
        .await?;

        tracing::info!(user_id, skills = skills.len(), "Skill ratings seeded");
        Ok(())
    }

    /// Seed ratings in their own transaction.
    pub async fn seed(
        pool: &PgPool,
        user_id: DbId,
        ratings: &BTreeMap<Skill, f64>,
    ) -> Result<(), RepoError> {
        let mut tx = pool.begin().await?;
        Self::seed_tx(&mut *tx, user_id, ratings).await?;
        tx.commit().await?;
        Ok(())
    }
}
