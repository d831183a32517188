use crate::auto_contributions::AutoContributionRule;
use crate::errors::Result;
use crate::streaks::StreakState;

/// Repository for the state the engine owns.
///
/// Loads return `Ok(None)` / an empty set when nothing was saved yet, and an
/// error when a record exists but cannot be decoded.
pub trait EngineStateRepositoryTrait: Send + Sync {
    fn load_streak_state(&self) -> Result<Option<StreakState>>;

    fn save_streak_state(&self, state: &StreakState) -> Result<()>;

    fn load_auto_contribution_rules(&self) -> Result<Vec<AutoContributionRule>>;

    fn save_auto_contribution_rules(&self, rules: &[AutoContributionRule]) -> Result<()>;
}
