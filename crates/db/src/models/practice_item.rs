//! Practice item catalog models and DTOs.

use serde::{Deserialize, Serialize};
use skilldrill_core::catalog::{CatalogItem, DifficultyBand};
use skilldrill_core::error::CoreError;
use skilldrill_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `practice_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PracticeItem {
    pub id: DbId,
    pub external_key: String,
    pub tags: Vec<String>,
    pub difficulty_band: String,
    pub difficulty: f64,
    pub is_live: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PracticeItem {
    /// Resolve tags and band into the selection view.
    pub fn to_catalog_item(&self) -> Result<CatalogItem, CoreError> {
        let band: DifficultyBand = self.difficulty_band.parse()?;
        Ok(CatalogItem::from_tags(self.id, &self.tags, band, self.difficulty))
    }
}

/// DTO for registering an item from the external catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePracticeItem {
    pub external_key: String,
    pub tags: Vec<String>,
    pub difficulty_band: DifficultyBand,
    pub difficulty: f64,
    pub is_live: Option<bool>,
}
