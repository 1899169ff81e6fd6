//! Placement test models.

use std::collections::BTreeMap;

use serde::Serialize;
use skilldrill_core::placement::PlacementResponse;
use skilldrill_core::skills::Skill;
use skilldrill_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `placement_sessions` table: the generated test.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlacementSession {
    pub user_id: DbId,
    pub item_ids: Vec<DbId>,
    pub created_at: Timestamp,
}

/// A row from the `placement_results` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlacementResult {
    pub id: DbId,
    pub user_id: DbId,
    pub responses: Json<Vec<PlacementResponse>>,
    pub initial_ratings: Json<BTreeMap<Skill, f64>>,
    pub recommended_track: String,
    pub ratings_seeded: bool,
    pub completed_at: Timestamp,
}

/// DTO for storing a scored placement.
#[derive(Debug, Clone)]
pub struct CreatePlacementResult {
    pub user_id: DbId,
    pub responses: Vec<PlacementResponse>,
    pub initial_ratings: BTreeMap<Skill, f64>,
    pub recommended_track: String,
    pub ratings_seeded: bool,
}
