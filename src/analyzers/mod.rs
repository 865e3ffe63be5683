//! Quiz submission analysis.
//!
//! Detects the quiz columns of a wide submission table, flattens every row
//! into per-(student, quiz) observations, and derives per-quiz statistics,
//! section-wide statistics and the two leaderboards from them.

pub mod aggregate;
pub mod analyzer;
pub mod cache;
pub mod champions;
pub mod flatten;
pub mod grade;
pub mod leaderboard;
pub mod schema;
pub mod section;
pub mod types;
pub mod utility;
