//! Streak domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time_utils::YearMonth;

/// Persisted streak state, one per install.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakState {
    pub current_streak_days: u32,
    pub last_contribution_instant: Option<DateTime<Utc>>,
    pub freeze_tokens: u32,
    pub last_freeze_grant_month: Option<YearMonth>,
    /// Longest streak ever reached. Informational only.
    #[serde(default)]
    pub best_streak_days: u32,
}

/// What a single registration did to the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StreakUpdate {
    /// First contribution ever.
    Started,
    /// Another contribution on an already counted day.
    SameDay,
    /// Contribution on the day after the last one.
    Extended,
    /// One missed day forgiven by spending a freeze token.
    FreezeConsumed,
    /// Gap too large; streak restarted at 1.
    Reset,
}
