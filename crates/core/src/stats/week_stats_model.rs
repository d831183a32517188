use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Rollup of the trailing week of contributions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekStats {
    pub total_added: Decimal,
    /// Share of the reference goal's remaining amount covered this week, in `[0, 1]`.
    pub percent_to_goal: Decimal,
    /// Weekday with the highest summed amount; empty when there was no activity.
    pub best_day: String,
}
