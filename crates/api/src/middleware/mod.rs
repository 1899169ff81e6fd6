//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- Extracts the learner from a JWT Bearer token.

pub mod auth;
