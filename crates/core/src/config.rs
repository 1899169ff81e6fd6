//! Product-tuning parameters for rating, review spacing and streaks.
//!
//! Defaults match the production tuning; the API layer overrides them from
//! the environment and calls [`PracticeConfig::validate`] at startup.

use crate::error::CoreError;

/// Default Elo sensitivity constant.
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Default review spacing in days, indexed by interval stage.
pub const DEFAULT_REVIEW_INTERVALS_DAYS: [i64; 5] = [1, 3, 7, 14, 30];

/// Repair tokens granted when a streak record is first created.
pub const DEFAULT_INITIAL_REPAIR_TOKENS: i32 = 2;

/// Upper bound on held repair tokens.
pub const DEFAULT_MAX_REPAIR_TOKENS: i32 = 3;

/// A repair token is earned at every multiple of this streak length.
pub const DEFAULT_REPAIR_TOKEN_AWARD_DAYS: i32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeConfig {
    /// Elo K: larger adapts faster but is noisier.
    pub k_factor: f64,
    /// Days until the next review for each interval stage. The last entry
    /// is reused for every stage beyond the table.
    pub review_intervals_days: Vec<i64>,
    pub initial_repair_tokens: i32,
    pub max_repair_tokens: i32,
    /// `0` disables earning tokens back.
    pub repair_token_award_days: i32,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            k_factor: DEFAULT_K_FACTOR,
            review_intervals_days: DEFAULT_REVIEW_INTERVALS_DAYS.to_vec(),
            initial_repair_tokens: DEFAULT_INITIAL_REPAIR_TOKENS,
            max_repair_tokens: DEFAULT_MAX_REPAIR_TOKENS,
            repair_token_award_days: DEFAULT_REPAIR_TOKEN_AWARD_DAYS,
        }
    }
}

impl PracticeConfig {
    /// Reject configurations that would break scheduling invariants.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(CoreError::Validation(format!(
                "k_factor must be a positive finite number, got {}",
                self.k_factor
            )));
        }
        if self.review_intervals_days.is_empty() {
            return Err(CoreError::Validation(
                "review_intervals_days must not be empty".to_string(),
            ));
        }
        if self.review_intervals_days.iter().any(|d| *d <= 0) {
            return Err(CoreError::Validation(
                "review_intervals_days must all be positive".to_string(),
            ));
        }
        if self.review_intervals_days.windows(2).any(|w| w[1] < w[0]) {
            return Err(CoreError::Validation(
                "review_intervals_days must be non-decreasing".to_string(),
            ));
        }
        if self.initial_repair_tokens < 0 || self.max_repair_tokens < self.initial_repair_tokens {
            return Err(CoreError::Validation(format!(
                "repair tokens must satisfy 0 <= initial ({}) <= max ({})",
                self.initial_repair_tokens, self.max_repair_tokens
            )));
        }
        if self.repair_token_award_days < 0 {
            return Err(CoreError::Validation(
                "repair_token_award_days must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse a comma-separated list of day counts (`"1,3,7"`).
    pub fn parse_intervals(raw: &str) -> Result<Vec<i64>, CoreError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<i64>().map_err(|_| {
                    CoreError::Validation(format!("Invalid review interval '{s}'"))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PracticeConfig::default().validate().is_ok());
    }

    #[test]
    fn non_positive_k_is_rejected() {
        let config = PracticeConfig {
            k_factor: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PracticeConfig {
            k_factor: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn shrinking_intervals_are_rejected() {
        let config = PracticeConfig {
            review_intervals_days: vec![1, 7, 3],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_intervals_are_rejected() {
        let config = PracticeConfig {
            review_intervals_days: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn max_tokens_below_initial_is_rejected() {
        let config = PracticeConfig {
            initial_repair_tokens: 3,
            max_repair_tokens: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_intervals_accepts_spaces() {
        assert_eq!(
            PracticeConfig::parse_intervals(" 1, 2 ,5").unwrap(),
            vec![1, 2, 5]
        );
        assert!(PracticeConfig::parse_intervals("1,x").is_err());
    }
}
