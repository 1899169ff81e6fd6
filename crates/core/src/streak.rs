//! Practice streak state machine.
//!
//! Transitions are driven by the whole-day delta between "today" and the
//! last practice day:
//!
//! | delta | effect                                   |
//! |-------|------------------------------------------|
//! | none  | first ever completion, streak = 1        |
//! | <= 0  | already counted today, no-op             |
//! | 1     | streak + 1                               |
//! | > 1   | streak broken, restarts at 1             |
//!
//! A repair token rewrites the last practice day to yesterday so the next
//! completion sees a delta of 1. It only patches a single missed day.

use chrono::Duration;
use serde::Serialize;

use crate::config::PracticeConfig;
use crate::error::CoreError;
use crate::types::CalendarDay;

/// Per-user streak counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakState {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_practice_date: Option<CalendarDay>,
    pub repair_tokens: i32,
    pub total_drills_completed: i32,
}

/// What a completion did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakOutcome {
    AlreadyCounted,
    Started,
    Extended,
    Reset,
}

impl StreakState {
    /// A fresh record holding the configured starting tokens.
    pub fn new(initial_repair_tokens: i32) -> Self {
        Self {
            current_streak: 0,
            longest_streak: 0,
            last_practice_date: None,
            repair_tokens: initial_repair_tokens,
            total_drills_completed: 0,
        }
    }

    fn days_since_practice(&self, today: CalendarDay) -> Option<i64> {
        self.last_practice_date
            .map(|last| (today - last).num_days())
    }

    /// Apply one completed drill on `today`.
    pub fn record_completion(
        &self,
        today: CalendarDay,
        config: &PracticeConfig,
    ) -> (StreakState, StreakOutcome) {
        let outcome = match self.days_since_practice(today) {
            None => StreakOutcome::Started,
            Some(delta) if delta <= 0 => return (self.clone(), StreakOutcome::AlreadyCounted),
            Some(1) => StreakOutcome::Extended,
            Some(_) => StreakOutcome::Reset,
        };

        let current_streak = match outcome {
            StreakOutcome::Extended => self.current_streak + 1,
            _ => 1,
        };

        let mut repair_tokens = self.repair_tokens;
        if config.repair_token_award_days > 0
            && current_streak % config.repair_token_award_days == 0
            && repair_tokens < config.max_repair_tokens
        {
            repair_tokens += 1;
        }

        let next = StreakState {
            current_streak,
            longest_streak: self.longest_streak.max(current_streak),
            last_practice_date: Some(today),
            repair_tokens,
            total_drills_completed: self.total_drills_completed + 1,
        };
        (next, outcome)
    }

    /// Spend a token to bridge exactly one missed day before `today`.
    pub fn use_repair_token(&self, today: CalendarDay) -> Result<StreakState, CoreError> {
        if self.repair_tokens <= 0 {
            return Err(CoreError::InsufficientTokens {
                available: self.repair_tokens,
            });
        }

        match self.days_since_practice(today) {
            None => Err(CoreError::Conflict(
                "No streak to repair yet".to_string(),
            )),
            Some(delta) if delta < 2 => Err(CoreError::Conflict(
                "No missed day to repair".to_string(),
            )),
            Some(2) => Ok(StreakState {
                last_practice_date: Some(today - Duration::days(1)),
                repair_tokens: self.repair_tokens - 1,
                ..self.clone()
            }),
            Some(delta) => Err(CoreError::Conflict(format!(
                "Streak gap of {} days is too wide to repair",
                delta - 1
            ))),
        }
    }
}
