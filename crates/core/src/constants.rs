/// Hard ceiling on banked freeze tokens.
pub const MAX_FREEZE_TOKENS: u32 = 3;

/// Note attached to contributions materialised by the recurring scheduler
pub const AUTO_DEPOSIT_NOTE: &str = "Auto-deposit";

/// Trailing window used by the week statistics
pub const STATS_WINDOW_DAYS: i64 = 7;

/// Longest accepted statistics window
pub const MAX_STATS_WINDOW_DAYS: i64 = 366;

/// Streak length that unlocks the one-week badge and the Stage1 evolution
pub const WEEK_STREAK_DAYS: u32 = 7;

/// Streak length for the Stage2 evolution
pub const GOLDEN_STREAK_DAYS: u32 = 30;

/// Contribution count for the "ten contributions" milestone
pub const TEN_CONTRIBUTIONS: usize = 10;

/// Default time zone used for local day boundaries
pub const DEFAULT_TIMEZONE: &str = "UTC";
