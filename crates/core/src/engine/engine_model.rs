use serde::Serialize;

use crate::achievements::{AchievementOutcome, BadgeCode};
use crate::ledger::Contribution;
use crate::streaks::StreakUpdate;

/// Result of running one contribution through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionOutcome {
    pub contribution: Contribution,
    /// `None` when a catch-up occurrence predates the last registered
    /// contribution and so could not move the streak.
    pub streak_update: Option<StreakUpdate>,
    pub current_streak_days: u32,
    pub achievements: AchievementOutcome,
}

/// What an app activation did.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationReport {
    pub freeze_token_granted: bool,
    pub auto_contributions: Vec<ContributionOutcome>,
}

impl ActivationReport {
    /// Every badge unlocked during the activation, in unlock order.
    pub fn unlocked_badges(&self) -> Vec<BadgeCode> {
        self.auto_contributions
            .iter()
            .flat_map(|o| o.achievements.unlocked.iter().copied())
            .collect()
    }
}
