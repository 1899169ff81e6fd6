//! Item catalog view used by placement and drill selection.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::skills::{skills_for_tags, Skill};
use crate::types::DbId;

/// Coarse difficulty band assigned by content authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyBand {
    Foundation,
    Intermediate,
    Advanced,
}

impl DifficultyBand {
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyBand::Foundation => "foundation",
            DifficultyBand::Intermediate => "intermediate",
            DifficultyBand::Advanced => "advanced",
        }
    }
}

impl fmt::Display for DifficultyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyBand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foundation" => Ok(DifficultyBand::Foundation),
            "intermediate" => Ok(DifficultyBand::Intermediate),
            "advanced" => Ok(DifficultyBand::Advanced),
            other => Err(CoreError::Validation(format!(
                "Unknown difficulty band '{other}'"
            ))),
        }
    }
}

/// A practice item with its tags already resolved to skills.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub id: DbId,
    pub skills: BTreeSet<Skill>,
    pub band: DifficultyBand,
    /// Elo-scale difficulty.
    pub difficulty: f64,
}

impl CatalogItem {
    /// Build from raw catalog fields, resolving tags through the skill mapper.
    pub fn from_tags<S: AsRef<str>>(
        id: DbId,
        tags: &[S],
        band: DifficultyBand,
        difficulty: f64,
    ) -> Self {
        Self {
            id,
            skills: skills_for_tags(tags),
            band,
            difficulty,
        }
    }

    pub fn targets_any(&self, skills: &[Skill]) -> bool {
        skills.iter().any(|s| self.skills.contains(s))
    }
}
