//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for history listings. Clamped in the repository layer via
/// `clamp_history_limit`.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}
