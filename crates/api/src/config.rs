use skilldrill_core::config::{
    PracticeConfig, DEFAULT_INITIAL_REPAIR_TOKENS, DEFAULT_K_FACTOR, DEFAULT_MAX_REPAIR_TOKENS,
    DEFAULT_REPAIR_TOKEN_AWARD_DAYS,
};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT validation settings.
    pub jwt: JwtConfig,
    /// Rating, review spacing and streak tuning.
    pub practice: PracticeConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`JwtConfig::from_env`] and [`practice_from_env`] for the rest.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();
        let practice = practice_from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt,
            practice,
        }
    }
}

/// Load the practice tuning parameters.
///
/// | Env Var                   | Default        |
/// |---------------------------|----------------|
/// | `ELO_K_FACTOR`            | `32`           |
/// | `REVIEW_INTERVALS_DAYS`   | `1,3,7,14,30`  |
/// | `INITIAL_REPAIR_TOKENS`   | `2`            |
/// | `MAX_REPAIR_TOKENS`       | `3`            |
/// | `REPAIR_TOKEN_AWARD_DAYS` | `7`            |
///
/// # Panics
///
/// Panics if a value does not parse or the resulting configuration fails
/// [`PracticeConfig::validate`].
pub fn practice_from_env() -> PracticeConfig {
    let defaults = PracticeConfig::default();

    let k_factor: f64 = std::env::var("ELO_K_FACTOR")
        .unwrap_or_else(|_| DEFAULT_K_FACTOR.to_string())
        .parse()
        .expect("ELO_K_FACTOR must be a valid f64");

    let review_intervals_days = match std::env::var("REVIEW_INTERVALS_DAYS") {
        Ok(raw) => PracticeConfig::parse_intervals(&raw)
            .expect("REVIEW_INTERVALS_DAYS must be a comma-separated list of days"),
        Err(_) => defaults.review_intervals_days,
    };

    let initial_repair_tokens: i32 = std::env::var("INITIAL_REPAIR_TOKENS")
        .unwrap_or_else(|_| DEFAULT_INITIAL_REPAIR_TOKENS.to_string())
        .parse()
        .expect("INITIAL_REPAIR_TOKENS must be a valid i32");

    let max_repair_tokens: i32 = std::env::var("MAX_REPAIR_TOKENS")
        .unwrap_or_else(|_| DEFAULT_MAX_REPAIR_TOKENS.to_string())
        .parse()
        .expect("MAX_REPAIR_TOKENS must be a valid i32");

    let repair_token_award_days: i32 = std::env::var("REPAIR_TOKEN_AWARD_DAYS")
        .unwrap_or_else(|_| DEFAULT_REPAIR_TOKEN_AWARD_DAYS.to_string())
        .parse()
        .expect("REPAIR_TOKEN_AWARD_DAYS must be a valid i32");

    let config = PracticeConfig {
        k_factor,
        review_intervals_days,
        initial_repair_tokens,
        max_repair_tokens,
        repair_token_award_days,
    };
    if let Err(e) = config.validate() {
        panic!("Invalid practice configuration: {e}");
    }
    config
}
