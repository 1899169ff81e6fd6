//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that must compose into a
//! caller's transaction take `&mut PgConnection` instead and carry a `_tx`
//! suffix when a pool-based twin exists.

pub mod drill_repo;
pub mod placement_repo;
pub mod practice_item_repo;
pub mod review_deck_repo;
pub mod skill_rating_repo;
pub mod streak_repo;

pub use drill_repo::DrillRepo;
pub use placement_repo::PlacementRepo;
pub use practice_item_repo::PracticeItemRepo;
pub use review_deck_repo::ReviewDeckRepo;
pub use skill_rating_repo::SkillRatingRepo;
pub use streak_repo::StreakRepo;
