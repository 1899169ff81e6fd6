//! Domain logic for adaptive skill rating and daily practice scheduling.
//!
//! This crate has no I/O. Every function here is pure (or takes an explicit
//! RNG) so the persistence and HTTP layers can stay thin and the rules stay
//! testable in isolation.

pub mod catalog;
pub mod config;
pub mod drill;
pub mod elo;
pub mod error;
pub mod placement;
pub mod review;
pub mod skills;
pub mod streak;
pub mod types;
