//! Elo-style rating movement.
//!
//! [`update_rating`] is the single source of truth for how a rating moves
//! after an attempt. Callers must reject non-finite inputs first with
//! [`validate_rating_inputs`].

use crate::error::CoreError;

/// Rating every skill starts at before any evidence.
pub const BASELINE_RATING: f64 = 1500.0;

/// Hard lower bound. There is no ceiling.
pub const RATING_FLOOR: f64 = 0.0;

/// Lower edge of the range consuming logic treats as meaningful.
pub const MEANINGFUL_MIN: f64 = 1000.0;

/// Upper edge of the range consuming logic treats as meaningful.
pub const MEANINGFUL_MAX: f64 = 2000.0;

/// Probability that a learner at `rating` answers an item of
/// `item_difficulty` correctly.
pub fn expected_score(rating: f64, item_difficulty: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((item_difficulty - rating) / 400.0))
}

/// New rating after one attempt, clamped to [`RATING_FLOOR`].
pub fn update_rating(rating: f64, item_difficulty: f64, correct: bool, k_factor: f64) -> f64 {
    let actual = if correct { 1.0 } else { 0.0 };
    let next = rating + k_factor * (actual - expected_score(rating, item_difficulty));
    next.max(RATING_FLOOR)
}

/// Reject NaN / infinite ratings or difficulties.
pub fn validate_rating_inputs(rating: f64, item_difficulty: f64) -> Result<(), CoreError> {
    if !rating.is_finite() {
        return Err(CoreError::Validation(format!(
            "rating must be finite, got {rating}"
        )));
    }
    if !item_difficulty.is_finite() {
        return Err(CoreError::Validation(format!(
            "item difficulty must be finite, got {item_difficulty}"
        )));
    }
    Ok(())
}

/// Clamp a stored rating into the meaningful band for ranking and display.
pub fn effective_rating(rating: f64) -> f64 {
    rating.clamp(MEANINGFUL_MIN, MEANINGFUL_MAX)
}
