use std::sync::Arc;

use log::{debug, info, warn};
use serde::Serialize;

use super::achievements_model::{BadgeCode, EvolutionStage};
use super::achievements_rules::{AchievementEvaluator, EvaluationContext};
use crate::errors::Result;
use crate::ledger::{Contribution, LedgerTrait};

/// Badge transitions written back to the ledger for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementOutcome {
    /// Badges whose `obtained_at` was set by this event.
    pub unlocked: Vec<BadgeCode>,
    /// Already-unlocked badges raised to `stage`.
    pub evolved: Vec<BadgeCode>,
    pub stage: EvolutionStage,
}

/// Runs the rule pass and persists unlocks and evolutions through the ledger.
pub struct AchievementService {
    ledger: Arc<dyn LedgerTrait>,
    evaluator: AchievementEvaluator,
}

impl AchievementService {
    pub fn new(ledger: Arc<dyn LedgerTrait>, evaluator: AchievementEvaluator) -> Self {
        AchievementService { ledger, evaluator }
    }

    /// Evaluates `event` after it has been registered with the streak tracker.
    ///
    /// Safe to repeat for the same event: an existing unlock instant is never
    /// overwritten and evolution only ever moves up.
    pub fn process_contribution(
        &self,
        event: &Contribution,
        current_streak_days: u32,
    ) -> Result<AchievementOutcome> {
        let total_contributions = self.ledger.count_contributions()?;
        let goal = match event.goal_id {
            Some(goal_id) => self.ledger.goal(&goal_id)?,
            None => None,
        };

        let context = EvaluationContext {
            current_streak_days,
            total_contributions,
            goal: goal.as_ref(),
        };
        let satisfied = self.evaluator.evaluate(event, &context);
        debug!("Rules satisfied by {}: {:?}", event.id, satisfied);

        let mut badges = self.ledger.badges()?;
        let mut outcome = AchievementOutcome {
            stage: AchievementEvaluator::target_evolution(current_streak_days),
            ..Default::default()
        };

        for code in satisfied {
            let Some(badge) = badges.iter_mut().find(|b| b.code == code) else {
                warn!("Badge '{}' missing from the ledger catalogue", code);
                continue;
            };
            if badge.obtained_at.is_some() {
                continue;
            }
            self.ledger.set_badge_obtained(code, event.instant, None)?;
            badge.obtained_at = Some(event.instant);
            outcome.unlocked.push(code);
        }

        // Evolution pass runs after unlocks so new badges join the current tier.
        for badge in badges.iter_mut() {
            let Some(obtained_at) = badge.obtained_at else {
                continue;
            };
            if badge.evolution >= outcome.stage {
                continue;
            }
            self.ledger
                .set_badge_obtained(badge.code, obtained_at, Some(outcome.stage))?;
            badge.evolution = outcome.stage;
            outcome.evolved.push(badge.code);
        }

        if !outcome.unlocked.is_empty() {
            info!("Unlocked badges: {:?}", outcome.unlocked);
        }
        if !outcome.evolved.is_empty() {
            info!(
                "Evolved {} badge(s) to {}",
                outcome.evolved.len(),
                outcome.stage.label()
            );
        }
        Ok(outcome)
    }

    /// Locks every badge in the catalogue again.
    pub fn reset_all(&self) -> Result<()> {
        for badge in self.ledger.badges()? {
            self.ledger.reset_badge(badge.code)?;
        }
        info!("All badges reset");
        Ok(())
    }
}
