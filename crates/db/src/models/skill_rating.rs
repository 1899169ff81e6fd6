//! Skill rating models.

use serde::{Deserialize, Serialize};
use skilldrill_core::skills::Skill;
use skilldrill_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `skill_ratings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SkillRating {
    pub id: DbId,
    pub user_id: DbId,
    pub skill: String,
    pub rating: f64,
    pub attempt_count: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Rating movement produced by one attempt on one skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub skill: Skill,
    pub previous: f64,
    pub rating: f64,
}

/// A skill's current rating, defaulted when no row exists yet.
#[derive(Debug, Clone, Serialize)]
pub struct SkillRatingSummary {
    pub skill: Skill,
    pub rating: f64,
    pub attempt_count: i32,
    pub updated_at: Option<Timestamp>,
}
