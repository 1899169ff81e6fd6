//! Spaced-repetition rescheduling for the review deck.
//!
//! Each deck entry sits at an interval stage. A correct attempt advances the
//! stage one step and pushes the due date out by that stage's interval; an
//! incorrect attempt drops the entry back to stage 0, due again tomorrow.

use chrono::Duration;
use serde::Serialize;

use crate::types::Timestamp;

/// Stage every entry returns to after a miss.
pub const RESET_STAGE: i32 = 0;

/// Days until an entry resurfaces after a miss.
pub const RESET_INTERVAL_DAYS: i64 = 1;

/// Scheduling state of one (user, item) entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewState {
    pub interval_stage: i32,
    pub due_at: Timestamp,
}

/// Interval table indexed by stage; the last interval repeats past the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSchedule {
    intervals_days: Vec<i64>,
}

impl ReviewSchedule {
    /// `intervals_days` must be non-empty; an empty table falls back to
    /// the reset interval for every stage.
    pub fn new(intervals_days: Vec<i64>) -> Self {
        Self { intervals_days }
    }

    /// Days until the next review for `stage`.
    pub fn interval_days(&self, stage: i32) -> i64 {
        let idx = usize::try_from(stage.max(0)).unwrap_or(0);
        self.intervals_days
            .get(idx)
            .or_else(|| self.intervals_days.last())
            .copied()
            .unwrap_or(RESET_INTERVAL_DAYS)
    }

    /// Highest stage with its own interval.
    pub fn max_stage(&self) -> i32 {
        i32::try_from(self.intervals_days.len().saturating_sub(1)).unwrap_or(i32::MAX)
    }

    /// Next state after an attempt at `now`.
    ///
    /// `previous` is `None` for an item's first attempt; that attempt is
    /// treated as advancing from stage 0 when correct. A correct attempt
    /// never moves `due_at` earlier than it already was.
    pub fn next_state(
        &self,
        previous: Option<ReviewState>,
        correct: bool,
        now: Timestamp,
    ) -> ReviewState {
        if !correct {
            return ReviewState {
                interval_stage: RESET_STAGE,
                due_at: now + Duration::days(RESET_INTERVAL_DAYS),
            };
        }

        let stage = match previous {
            Some(prev) => (prev.interval_stage + 1).min(self.max_stage()),
            None => (RESET_STAGE + 1).min(self.max_stage()),
        };
        let candidate = now + Duration::days(self.interval_days(stage));
        let due_at = match previous {
            Some(prev) if prev.due_at > candidate => prev.due_at,
            _ => candidate,
        };

        ReviewState {
            interval_stage: stage,
            due_at,
        }
    }
}

impl Default for ReviewSchedule {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_REVIEW_INTERVALS_DAYS.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn first_correct_attempt_lands_on_stage_one() {
        let schedule = ReviewSchedule::default();
        let state = schedule.next_state(None, true, t0());
        assert_eq!(state.interval_stage, 1);
        assert_eq!(state.due_at, t0() + Duration::days(3));
    }

    #[test]
    fn first_incorrect_attempt_creates_stage_zero_due_tomorrow() {
        let schedule = ReviewSchedule::default();
        let state = schedule.next_state(None, false, t0());
        assert_eq!(state.interval_stage, 0);
        assert_eq!(state.due_at, t0() + Duration::days(1));
    }

    #[test]
    fn successive_correct_attempts_follow_the_interval_table() {
        let schedule = ReviewSchedule::default();
        let mut now = t0();
        let mut state = schedule.next_state(None, false, now);
        let mut stages = Vec::new();
        for _ in 0..6 {
            now = state.due_at;
            let next = schedule.next_state(Some(state), true, now);
            assert!(next.due_at >= state.due_at);
            stages.push((next.interval_stage, (next.due_at - now).num_days()));
            state = next;
        }
        assert_eq!(
            stages,
            vec![(1, 3), (2, 7), (3, 14), (4, 30), (4, 30), (4, 30)]
        );
    }

    #[test]
    fn early_correct_review_never_pulls_due_date_in() {
        let schedule = ReviewSchedule::default();
        let prev = ReviewState {
            interval_stage: 3,
            due_at: t0() + Duration::days(40),
        };
        let next = schedule.next_state(Some(prev), true, t0());
        assert_eq!(next.interval_stage, 4);
        assert_eq!(next.due_at, prev.due_at);
    }

    #[test]
    fn miss_resets_stage_from_any_level() {
        let schedule = ReviewSchedule::default();
        for stage in 0..=4 {
            let prev = ReviewState {
                interval_stage: stage,
                due_at: t0(),
            };
            let next = schedule.next_state(Some(prev), false, t0());
            assert_eq!(next.interval_stage, RESET_STAGE);
            assert_eq!(next.due_at, t0() + Duration::days(1));
        }
    }

    #[test]
    fn custom_schedule_reuses_last_interval() {
        let schedule = ReviewSchedule::new(vec![2, 5]);
        assert_eq!(schedule.interval_days(0), 2);
        assert_eq!(schedule.interval_days(1), 5);
        assert_eq!(schedule.interval_days(9), 5);
        assert_eq!(schedule.max_stage(), 1);
    }
}
