//! Streaks module - consecutive contribution days and freeze tokens.

mod streak_tracker;
mod streaks_model;

pub use streak_tracker::StreakTracker;
pub use streaks_model::{StreakState, StreakUpdate};
