use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::achievements::{Badge, BadgeCode, EvolutionStage};
use crate::errors::Result;
use crate::goals::Goal;
use crate::ledger::{Contribution, NewContribution};

/// Collaborator contract with the host's ledger.
///
/// The ledger owns contributions, goals and the badge catalogue. The engine
/// only reads from it and writes badge transitions and auto-deposits back.
/// Implementations are expected to keep each goal's saved total in step with
/// the contributions recorded against it.
pub trait LedgerTrait: Send + Sync {
    /// Records a contribution and returns the stored record.
    fn record_contribution(&self, new_contribution: NewContribution) -> Result<Contribution>;

    /// All goals in stable catalogue order.
    fn goals(&self) -> Result<Vec<Goal>>;

    fn goal(&self, goal_id: &Uuid) -> Result<Option<Goal>>;

    /// The badge catalogue with current unlock state.
    fn badges(&self) -> Result<Vec<Badge>>;

    /// Stores the unlock instant of a badge and optionally its evolution stage.
    fn set_badge_obtained(
        &self,
        code: BadgeCode,
        at: DateTime<Utc>,
        evolution: Option<EvolutionStage>,
    ) -> Result<()>;

    /// Locks a badge again and returns it to `Stage0`.
    fn reset_badge(&self, code: BadgeCode) -> Result<()>;

    /// Contributions with `instant >= since`, oldest first.
    fn contributions_since(&self, since: DateTime<Utc>) -> Result<Vec<Contribution>>;

    /// Total number of contributions ever recorded.
    fn count_contributions(&self) -> Result<usize> {
        Ok(self.contributions_since(DateTime::<Utc>::MIN_UTC)?.len())
    }
}
