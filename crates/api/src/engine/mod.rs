//! Orchestration engines.
//!
//! Each engine composes repository calls into one user-facing operation and
//! owns the transaction boundaries for it. Handlers stay thin: they extract
//! the user and request body, call an engine, and wrap the result.

pub mod drill;
pub mod placement;

pub use drill::DrillScheduler;
pub use placement::PlacementEngine;
