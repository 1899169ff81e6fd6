pub mod drills;
pub mod placement;
pub mod ratings;
pub mod streak;
