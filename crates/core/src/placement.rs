//! One-time placement test: item sampling, scoring and track recommendation.
//!
//! A placement test draws [`PLACEMENT_ITEMS_PER_SKILL`] foundation items for
//! each of the [`MAJOR_SKILLS`]. Per-skill accuracy is mapped linearly onto
//! a deliberately narrow band (1300..=1700); skills the test did not touch
//! start at [`BASELINE_RATING`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogItem, DifficultyBand};
use crate::elo::BASELINE_RATING;
use crate::error::CoreError;
use crate::skills::{Skill, Track, MAJOR_SKILLS};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PLACEMENT_ITEMS_PER_SKILL: usize = 2;

/// 2 items x 6 major skills.
pub const PLACEMENT_TEST_SIZE: usize = PLACEMENT_ITEMS_PER_SKILL * MAJOR_SKILLS.len();

/// Rating for 0% accuracy.
pub const PLACEMENT_RATING_BASE: f64 = 1300.0;

/// Rating gained between 0% and 100% accuracy.
pub const PLACEMENT_RATING_SPAN: f64 = 400.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One answered placement item as submitted by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResponse {
    pub item_id: DbId,
    pub response: String,
    pub correct: bool,
    pub response_time_ms: i64,
}

/// A graded answer with the skills its item exercises.
#[derive(Debug, Clone)]
pub struct ScoredAnswer {
    pub skills: BTreeSet<Skill>,
    pub correct: bool,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Draw a balanced placement test from the catalog.
///
/// Only foundation-band items are eligible. An item tagged with several
/// major skills is used for at most one of them. Each major skill owns
/// [`PLACEMENT_ITEMS_PER_SKILL`] slots and items are assigned to slots by
/// augmenting paths over a shuffled candidate order, so an assignment is
/// found whenever one exists. Fails with `InsufficientContent` when no
/// assignment exists, rather than returning a short test.
pub fn select_placement_items<R: Rng + ?Sized>(
    pool: &[CatalogItem],
    rng: &mut R,
) -> Result<Vec<DbId>, CoreError> {
    let mut slot_candidates: Vec<Vec<DbId>> = Vec::with_capacity(PLACEMENT_TEST_SIZE);
    let mut slot_skills: Vec<Skill> = Vec::with_capacity(PLACEMENT_TEST_SIZE);

    for skill in MAJOR_SKILLS {
        let mut candidates: Vec<DbId> = pool
            .iter()
            .filter(|item| item.band == DifficultyBand::Foundation)
            .filter(|item| item.skills.contains(&skill))
            .map(|item| item.id)
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        if candidates.len() < PLACEMENT_ITEMS_PER_SKILL {
            return Err(CoreError::InsufficientContent(format!(
                "Placement needs {PLACEMENT_ITEMS_PER_SKILL} foundation items for '{skill}', \
                 found {}",
                candidates.len()
            )));
        }

        for _ in 0..PLACEMENT_ITEMS_PER_SKILL {
            candidates.shuffle(rng);
            slot_candidates.push(candidates.clone());
            slot_skills.push(skill);
        }
    }

    let mut owner: HashMap<DbId, usize> = HashMap::new();
    for slot in 0..slot_candidates.len() {
        let mut visited = HashSet::new();
        if !assign_slot(slot, &slot_candidates, &mut owner, &mut visited) {
            return Err(CoreError::InsufficientContent(format!(
                "Placement cannot give '{}' {PLACEMENT_ITEMS_PER_SKILL} foundation items \
                 without sharing them with another skill",
                slot_skills[slot]
            )));
        }
    }

    let mut by_slot: Vec<(usize, DbId)> = owner.into_iter().map(|(id, slot)| (slot, id)).collect();
    by_slot.sort_unstable();
    Ok(by_slot.into_iter().map(|(_, id)| id).collect())
}

/// Find an item for `slot`, moving earlier assignments along an augmenting
/// path when every candidate is taken.
fn assign_slot(
    slot: usize,
    slot_candidates: &[Vec<DbId>],
    owner: &mut HashMap<DbId, usize>,
    visited: &mut HashSet<DbId>,
) -> bool {
    for &id in &slot_candidates[slot] {
        if !visited.insert(id) {
            continue;
        }
        let free = match owner.get(&id).copied() {
            None => true,
            Some(other) => assign_slot(other, slot_candidates, owner, visited),
        };
        if free {
            owner.insert(id, slot);
            return true;
        }
    }
    false
}

/// Check a submission against the generated test.
pub fn validate_submission(
    test_items: &[DbId],
    responses: &[PlacementResponse],
) -> Result<(), CoreError> {
    if responses.len() != test_items.len() {
        return Err(CoreError::Validation(format!(
            "Expected {} placement responses, got {}",
            test_items.len(),
            responses.len()
        )));
    }

    let expected: HashSet<DbId> = test_items.iter().copied().collect();
    let mut seen: HashSet<DbId> = HashSet::with_capacity(responses.len());
    for r in responses {
        if !expected.contains(&r.item_id) {
            return Err(CoreError::Validation(format!(
                "Item {} is not part of this placement test",
                r.item_id
            )));
        }
        if !seen.insert(r.item_id) {
            return Err(CoreError::Validation(format!(
                "Item {} answered more than once",
                r.item_id
            )));
        }
        if r.response_time_ms < 0 {
            return Err(CoreError::Validation(
                "response_time_ms must not be negative".to_string(),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Linear accuracy -> rating map.
pub fn rating_for_accuracy(accuracy: f64) -> f64 {
    PLACEMENT_RATING_BASE + accuracy.clamp(0.0, 1.0) * PLACEMENT_RATING_SPAN
}

/// Initial rating for every skill.
///
/// An answer counts toward each skill its item maps to.
pub fn score_placement(answers: &[ScoredAnswer]) -> BTreeMap<Skill, f64> {
    let mut tallies: BTreeMap<Skill, (u32, u32)> = BTreeMap::new();
    for answer in answers {
        for skill in &answer.skills {
            let entry = tallies.entry(*skill).or_insert((0, 0));
            entry.1 += 1;
            if answer.correct {
                entry.0 += 1;
            }
        }
    }

    Skill::ALL
        .into_iter()
        .map(|skill| {
            let rating = match tallies.get(&skill) {
                Some((correct, total)) if *total > 0 => {
                    rating_for_accuracy(f64::from(*correct) / f64::from(*total))
                }
                _ => BASELINE_RATING,
            };
            (skill, rating)
        })
        .collect()
}

/// Composite score of a track over a rating map (missing skills at baseline).
pub fn track_score(track: Track, ratings: &BTreeMap<Skill, f64>) -> f64 {
    track
        .composite_skills()
        .iter()
        .map(|skill| ratings.get(skill).copied().unwrap_or(BASELINE_RATING))
        .sum()
}

/// Highest-scoring track; ties go to the earlier track in [`Track::ALL`].
pub fn recommend_track(ratings: &BTreeMap<Skill, f64>) -> Track {
    let mut best = Track::ALL[0];
    let mut best_score = track_score(best, ratings);
    for track in Track::ALL.into_iter().skip(1) {
        let score = track_score(track, ratings);
        if score > best_score {
            best = track;
            best_score = score;
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
