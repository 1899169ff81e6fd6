//! Review deck models.

use serde::Serialize;
use skilldrill_core::review::ReviewState;
use skilldrill_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `review_deck_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewDeckEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub item_id: DbId,
    pub due_at: Timestamp,
    pub interval_stage: i32,
    pub attempt_count: i32,
    pub last_attempt_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReviewDeckEntry {
    pub fn state(&self) -> ReviewState {
        ReviewState {
            interval_stage: self.interval_stage,
            due_at: self.due_at,
        }
    }
}
