//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus any input DTOs the repositories accept.

pub mod drill;
pub mod placement;
pub mod practice_item;
pub mod review;
pub mod skill_rating;
pub mod streak;
