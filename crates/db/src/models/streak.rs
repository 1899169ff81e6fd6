//! Streak record models.

use serde::Serialize;
use skilldrill_core::streak::StreakState;
use skilldrill_core::types::{CalendarDay, DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `streak_records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StreakRecord {
    pub user_id: DbId,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_practice_date: Option<CalendarDay>,
    pub repair_tokens: i32,
    pub total_drills_completed: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StreakRecord {
    pub fn state(&self) -> StreakState {
        StreakState {
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
            last_practice_date: self.last_practice_date,
            repair_tokens: self.repair_tokens,
            total_drills_completed: self.total_drills_completed,
        }
    }
}
