//! Daily drill models and DTOs.

use serde::{Deserialize, Serialize};
use skilldrill_core::drill::DrillStatus;
use skilldrill_core::error::CoreError;
use skilldrill_core::types::{CalendarDay, DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::skill_rating::RatingChange;

/// A row from the `daily_drills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyDrill {
    pub id: DbId,
    pub user_id: DbId,
    pub drill_date: CalendarDay,
    pub item_ids: Vec<DbId>,
    pub completed_item_ids: Vec<DbId>,
    pub status: String,
    pub time_spent_ms: i64,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DailyDrill {
    pub fn status(&self) -> Result<DrillStatus, CoreError> {
        self.status.parse()
    }
}

/// A row from the `drill_item_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DrillItemAttempt {
    pub id: DbId,
    pub drill_id: DbId,
    pub user_id: DbId,
    pub item_id: DbId,
    pub response: Option<String>,
    pub correct: bool,
    pub time_ms: i64,
    pub rating_changes: Json<Vec<RatingChange>>,
    pub created_at: Timestamp,
}

/// DTO for logging one completed drill item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDrillItemAttempt {
    pub drill_id: DbId,
    pub user_id: DbId,
    pub item_id: DbId,
    pub response: Option<String>,
    pub correct: bool,
    pub time_ms: i64,
    pub rating_changes: Vec<RatingChange>,
}
