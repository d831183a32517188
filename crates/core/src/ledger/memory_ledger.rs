//! In-process ledger backed by plain vectors.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::achievements::{badge_catalog, Badge, BadgeCode, EvolutionStage};
use crate::errors::{Error, Result, ValidationError};
use crate::goals::Goal;
use crate::ledger::{Contribution, LedgerTrait, NewContribution};

#[derive(Debug, Default)]
struct LedgerData {
    goals: Vec<Goal>,
    contributions: Vec<Contribution>,
    badges: Vec<Badge>,
}

/// Ledger kept entirely in memory, seeded with the badge catalogue.
#[derive(Debug)]
pub struct InMemoryLedger {
    data: RwLock<LedgerData>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(LedgerData {
                badges: badge_catalog(),
                ..Default::default()
            }),
        }
    }

    /// Appends a goal to the catalogue and returns it.
    pub fn add_goal(&self, goal: Goal) -> Result<Goal> {
        self.write()?.goals.push(goal.clone());
        Ok(goal)
    }

    /// Every recorded contribution, oldest first.
    pub fn contributions(&self) -> Result<Vec<Contribution>> {
        Ok(self.read()?.contributions.clone())
    }

    pub fn badge(&self, code: BadgeCode) -> Result<Option<Badge>> {
        Ok(self.read()?.badges.iter().find(|b| b.code == code).cloned())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, LedgerData>> {
        self.data
            .read()
            .map_err(|e| Error::Ledger(format!("ledger lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, LedgerData>> {
        self.data
            .write()
            .map_err(|e| Error::Ledger(format!("ledger lock poisoned: {}", e)))
    }
}

impl LedgerTrait for InMemoryLedger {
    fn record_contribution(&self, new_contribution: NewContribution) -> Result<Contribution> {
        let mut data = self.write()?;

        if let Some(goal_id) = new_contribution.goal_id {
            let goal = data
                .goals
                .iter_mut()
                .find(|g| g.id == goal_id)
                .ok_or(ValidationError::GoalNotFound(goal_id))?;
            goal.saved_amount = goal.saved_amount.saturating_add(new_contribution.amount);
        }

        let contribution = Contribution {
            id: Uuid::new_v4(),
            instant: new_contribution.instant,
            amount: new_contribution.amount,
            goal_id: new_contribution.goal_id,
            note: new_contribution.note,
            category: new_contribution.category,
        };

        // Keep the list ordered by instant; equal instants keep arrival order.
        let position = data
            .contributions
            .partition_point(|c| c.instant <= contribution.instant);
        data.contributions.insert(position, contribution.clone());

        Ok(contribution)
    }

    fn goals(&self) -> Result<Vec<Goal>> {
        Ok(self.read()?.goals.clone())
    }

    fn goal(&self, goal_id: &Uuid) -> Result<Option<Goal>> {
        Ok(self.read()?.goals.iter().find(|g| &g.id == goal_id).cloned())
    }

    fn badges(&self) -> Result<Vec<Badge>> {
        Ok(self.read()?.badges.clone())
    }

    fn set_badge_obtained(
        &self,
        code: BadgeCode,
        at: DateTime<Utc>,
        evolution: Option<EvolutionStage>,
    ) -> Result<()> {
        let mut data = self.write()?;
        let badge = data
            .badges
            .iter_mut()
            .find(|b| b.code == code)
            .ok_or_else(|| Error::Ledger(format!("badge '{}' is not in the catalogue", code)))?;
        badge.obtained_at = Some(at);
        if let Some(stage) = evolution {
            badge.evolution = stage;
        }
        Ok(())
    }

    fn reset_badge(&self, code: BadgeCode) -> Result<()> {
        let mut data = self.write()?;
        if let Some(badge) = data.badges.iter_mut().find(|b| b.code == code) {
            badge.obtained_at = None;
            badge.evolution = EvolutionStage::Stage0;
        }
        Ok(())
    }

    fn contributions_since(&self, since: DateTime<Utc>) -> Result<Vec<Contribution>> {
        Ok(self
            .read()?
            .contributions
            .iter()
            .filter(|c| c.instant >= since)
            .cloned()
            .collect())
    }

    fn count_contributions(&self) -> Result<usize> {
        Ok(self.read()?.contributions.len())
    }
}
