//! Daily drill assembly and completion rules.
//!
//! A drill is 3-5 items: up to [`DRILL_MAX_REVIEW_ITEMS`] due review items
//! first, then live items aimed at the learner's weakest skills. When the
//! pools are thin the drill is formed from whatever exists; only a drill
//! with nothing in it at all is refused.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::elo::{effective_rating, BASELINE_RATING};
use crate::error::CoreError;
use crate::skills::Skill;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Target lower bound; smaller drills are allowed when content is short.
pub const DRILL_MIN_ITEMS: usize = 3;

pub const DRILL_MAX_ITEMS: usize = 5;

pub const DRILL_MAX_REVIEW_ITEMS: usize = 3;

/// Number of lowest-rated skills new material is drawn for.
pub const DRILL_TARGET_SKILLS: usize = 3;

/// Upper bound on the time reported for one item (24 hours).
pub const MAX_ITEM_TIME_MS: i64 = 24 * 60 * 60 * 1000;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Drill lifecycle. Only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillStatus {
    Pending,
    InProgress,
    Completed,
}

impl DrillStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DrillStatus::Pending => "pending",
            DrillStatus::InProgress => "in_progress",
            DrillStatus::Completed => "completed",
        }
    }

    /// Forward moves only; staying put is allowed.
    pub fn can_transition(self, to: DrillStatus) -> bool {
        to >= self
    }

    /// Status implied by how many items are done.
    pub fn for_progress(completed: usize, total: usize) -> DrillStatus {
        if total > 0 && completed >= total {
            DrillStatus::Completed
        } else if completed > 0 {
            DrillStatus::InProgress
        } else {
            DrillStatus::Pending
        }
    }

    /// Next status after progress is made, refusing backward moves.
    pub fn advance(self, completed: usize, total: usize) -> Result<DrillStatus, CoreError> {
        let next = DrillStatus::for_progress(completed, total);
        if !self.can_transition(next) {
            return Err(CoreError::InvalidDrillState(format!(
                "Drill cannot move from {self} to {next}"
            )));
        }
        Ok(next)
    }
}

impl fmt::Display for DrillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrillStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DrillStatus::Pending),
            "in_progress" => Ok(DrillStatus::InProgress),
            "completed" => Ok(DrillStatus::Completed),
            other => Err(CoreError::Validation(format!(
                "Unknown drill status '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Result of drill planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrillPlan {
    pub item_ids: Vec<DbId>,
    /// How many leading entries of `item_ids` came from the review deck.
    pub review_count: usize,
    pub target_skills: Vec<Skill>,
}

/// The `n` lowest-rated skills. Missing ratings count as baseline and
/// ratings are compared inside the meaningful band, so anything below
/// [`MEANINGFUL_MIN`](crate::elo::MEANINGFUL_MIN) ties; equal ratings keep
/// skill declaration order.
pub fn weakest_skills(ratings: &BTreeMap<Skill, f64>, n: usize) -> Vec<Skill> {
    let mut ranked: Vec<(Skill, f64)> = Skill::ALL
        .into_iter()
        .map(|skill| {
            let rating = ratings.get(&skill).copied().unwrap_or(BASELINE_RATING);
            (skill, effective_rating(rating))
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(n).map(|(skill, _)| skill).collect()
}

/// Assemble a new drill.
///
/// `due_review` must already be oldest-due first. `live_items` is the pool
/// of candidate new material; only items touching `target_skills` are used.
pub fn plan_drill<R: Rng + ?Sized>(
    due_review: &[DbId],
    target_skills: &[Skill],
    live_items: &[CatalogItem],
    rng: &mut R,
) -> Result<DrillPlan, CoreError> {
    let mut item_ids: Vec<DbId> = Vec::with_capacity(DRILL_MAX_ITEMS);
    let mut chosen: HashSet<DbId> = HashSet::new();

    for id in due_review {
        if item_ids.len() >= DRILL_MAX_REVIEW_ITEMS {
            break;
        }
        if chosen.insert(*id) {
            item_ids.push(*id);
        }
    }
    let review_count = item_ids.len();

    let mut fresh: Vec<DbId> = live_items
        .iter()
        .filter(|item| item.targets_any(target_skills))
        .map(|item| item.id)
        .filter(|id| !chosen.contains(id))
        .collect();
    fresh.sort_unstable();
    fresh.dedup();
    fresh.shuffle(rng);

    for id in fresh {
        if item_ids.len() >= DRILL_MAX_ITEMS {
            break;
        }
        chosen.insert(id);
        item_ids.push(id);
    }

    if item_ids.is_empty() {
        return Err(CoreError::InsufficientContent(
            "No review or practice items available for a drill".to_string(),
        ));
    }

    Ok(DrillPlan {
        item_ids,
        review_count,
        target_skills: target_skills.to_vec(),
    })
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Reject negative or implausibly large item times.
pub fn validate_item_time(time_ms: i64) -> Result<(), CoreError> {
    if time_ms < 0 {
        return Err(CoreError::Validation("time_ms must not be negative".to_string()));
    }
    if time_ms > MAX_ITEM_TIME_MS {
        return Err(CoreError::Validation(format!(
            "time_ms must be at most {MAX_ITEM_TIME_MS}"
        )));
    }
    Ok(())
}

/// Validate completing `item_id` and report whether it finishes the drill.
pub fn check_item_completion(
    status: DrillStatus,
    item_ids: &[DbId],
    completed_item_ids: &[DbId],
    item_id: DbId,
) -> Result<bool, CoreError> {
    if status == DrillStatus::Completed {
        return Err(CoreError::InvalidDrillState(
            "Drill is already completed".to_string(),
        ));
    }
    if !item_ids.contains(&item_id) {
        return Err(CoreError::InvalidDrillState(format!(
            "Item {item_id} is not part of this drill"
        )));
    }
    if completed_item_ids.contains(&item_id) {
        return Err(CoreError::InvalidDrillState(format!(
            "Item {item_id} was already completed"
        )));
    }
    Ok(completed_item_ids.len() + 1 >= item_ids.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
