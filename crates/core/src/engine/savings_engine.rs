//! Pipeline wiring: contribution -> streak -> achievements, plus catch-up
//! of recurring contributions on activation.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::engine_model::{ActivationReport, ContributionOutcome};
use crate::achievements::{AchievementEvaluator, AchievementService};
use crate::auto_contributions::{AutoContributionRule, AutoContributionScheduler, Frequency};
use crate::errors::{Error, Result, StreakError, ValidationError};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::ledger::{Contribution, ContributionCategory, LedgerTrait, NewContribution};
use crate::settings::EngineSettings;
use crate::stats::{WeekStats, WeekStatsService};
use crate::storage::EngineStateRepositoryTrait;
use crate::streaks::{StreakState, StreakTracker, StreakUpdate};
use crate::utils::time_utils::Clock;

/// The savings progress and gamification engine.
///
/// Single-threaded by contract: mutating operations take `&mut self` and the
/// host serialises calls. All collaborators are injected at construction.
pub struct SavingsEngine {
    ledger: Arc<dyn LedgerTrait>,
    repository: Arc<dyn EngineStateRepositoryTrait>,
    clock: Arc<dyn Clock>,
    event_sink: Arc<dyn DomainEventSink>,
    settings: EngineSettings,
    streaks: StreakTracker,
    scheduler: AutoContributionScheduler,
    achievements: AchievementService,
    week_stats: WeekStatsService,
}

impl SavingsEngine {
    /// Builds the engine and loads its persisted state.
    ///
    /// Corrupt persisted records are logged and replaced by defaults (zero
    /// streak, no rules); invalid settings are an error.
    pub fn new(
        ledger: Arc<dyn LedgerTrait>,
        repository: Arc<dyn EngineStateRepositoryTrait>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Result<Self> {
        settings.validate()?;
        let calendar = settings.calendar()?;

        let streak_state = match repository.load_streak_state() {
            Ok(state) => state.unwrap_or_default(),
            Err(e) => {
                warn!("Discarding unreadable streak state: {}", e);
                StreakState::default()
            }
        };
        let rules = match repository.load_auto_contribution_rules() {
            Ok(rules) => rules,
            Err(e) => {
                warn!("Discarding unreadable auto-contribution rules: {}", e);
                Vec::new()
            }
        };
        debug!(
            "Loaded streak of {} day(s) and {} auto-contribution rule(s)",
            streak_state.current_streak_days,
            rules.len()
        );

        Ok(SavingsEngine {
            streaks: StreakTracker::new(streak_state, calendar, settings.max_freeze_tokens),
            scheduler: AutoContributionScheduler::new(rules, calendar),
            achievements: AchievementService::new(
                ledger.clone(),
                AchievementEvaluator::new(calendar),
            ),
            week_stats: WeekStatsService::new(ledger.clone(), calendar, settings.stats_window_days),
            ledger,
            repository,
            clock,
            event_sink: Arc::new(NoOpDomainEventSink),
            settings,
        })
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn streak_state(&self) -> &StreakState {
        self.streaks.state()
    }

    pub fn auto_contribution_rules(&self) -> &[AutoContributionRule] {
        self.scheduler.rules()
    }

    /// Next firing instant of the rule attached to `goal_id`.
    pub fn next_due(&self, goal_id: &Uuid) -> Option<DateTime<Utc>> {
        self.scheduler
            .rule(goal_id)
            .map(|rule| self.scheduler.next_due(rule))
    }

    /// Runs on every app activation: grants the monthly freeze token first so
    /// it can cover this session's gap, then catches up recurring rules.
    pub fn activate(&mut self) -> Result<ActivationReport> {
        let now = self.clock.now();
        let freeze_token_granted = self.grant_monthly_freeze_token(now)?;
        let auto_contributions = self.apply_due(now)?;

        Ok(ActivationReport {
            freeze_token_granted,
            auto_contributions,
        })
    }

    fn grant_monthly_freeze_token(&mut self, now: DateTime<Utc>) -> Result<bool> {
        let before = self.streaks.state().clone();
        let granted = self.streaks.grant_monthly_freeze_token(now);
        if self.streaks.state() != &before {
            self.repository.save_streak_state(self.streaks.state())?;
        }
        if granted {
            self.event_sink.emit(DomainEvent::FreezeTokenGranted {
                freeze_tokens: self.streaks.freeze_tokens(),
            });
        }
        Ok(granted)
    }

    /// Records a manual contribution in the ledger and runs the pipeline.
    pub fn record_contribution(
        &mut self,
        new_contribution: NewContribution,
    ) -> Result<ContributionOutcome> {
        if let Some(last) = self.streaks.last_contribution_instant() {
            if new_contribution.instant < last {
                // Reject before the ledger write so nothing is half-applied.
                return Err(StreakError::OutOfOrder {
                    last,
                    attempted: new_contribution.instant,
                }
                .into());
            }
        }
        let contribution = self.ledger.record_contribution(new_contribution)?;
        self.on_contribution_recorded(&contribution)
    }

    /// Pipeline entry for a contribution the host already wrote to the ledger.
    ///
    /// Contributions must arrive in non-decreasing timestamp order; an
    /// earlier one is rejected with `Error::Streak`.
    pub fn on_contribution_recorded(
        &mut self,
        contribution: &Contribution,
    ) -> Result<ContributionOutcome> {
        let update = self.streaks.register_contribution(contribution.instant)?;
        self.after_streak_step(contribution, Some(update))
    }

    fn after_streak_step(
        &mut self,
        contribution: &Contribution,
        update: Option<StreakUpdate>,
    ) -> Result<ContributionOutcome> {
        let current_streak_days = self.streaks.current_streak_days();

        if let Some(update) = update {
            self.repository.save_streak_state(self.streaks.state())?;
            self.event_sink.emit(DomainEvent::StreakUpdated {
                update,
                current_streak_days,
                freeze_tokens: self.streaks.freeze_tokens(),
            });
        }

        let achievements = self
            .achievements
            .process_contribution(contribution, current_streak_days)?;
        if !achievements.unlocked.is_empty() {
            self.event_sink.emit(DomainEvent::badges_unlocked(
                achievements.unlocked.clone(),
                contribution.instant,
            ));
        }
        if !achievements.evolved.is_empty() {
            self.event_sink.emit(DomainEvent::badges_evolved(
                achievements.evolved.clone(),
                achievements.stage,
            ));
        }

        Ok(ContributionOutcome {
            contribution: contribution.clone(),
            streak_update: update,
            current_streak_days,
            achievements,
        })
    }

    /// Materialises every due occurrence up to `now`, oldest first.
    ///
    /// Each occurrence is written to the ledger as an auto-deposit and then
    /// runs through the same pipeline as a manual contribution. A rule's
    /// `last_applied` advances to the last occurrence actually emitted.
    pub fn apply_due(&mut self, now: DateTime<Utc>) -> Result<Vec<ContributionOutcome>> {
        self.drop_orphaned_rules()?;

        let schedule = self.scheduler.due_schedule(now);
        if schedule.is_empty() {
            return Ok(Vec::new());
        }
        info!("Catching up {} auto-contribution(s)", schedule.len());

        let mut outcomes = Vec::with_capacity(schedule.len());
        let mut applied: BTreeMap<Uuid, (usize, DateTime<Utc>)> = BTreeMap::new();

        for occurrence in schedule {
            let contribution = self.ledger.record_contribution(
                NewContribution::new(occurrence.amount, occurrence.instant)
                    .for_goal(occurrence.goal_id)
                    .with_note(self.settings.auto_deposit_note.clone())
                    .with_category(ContributionCategory::AutoDeposit),
            )?;

            // Mark before the pipeline so a later failure cannot re-emit it.
            self.scheduler
                .mark_applied(&occurrence.goal_id, occurrence.instant);
            self.repository
                .save_auto_contribution_rules(self.scheduler.rules())?;
            let entry = applied
                .entry(occurrence.goal_id)
                .or_insert((0, occurrence.instant));
            entry.0 += 1;
            entry.1 = occurrence.instant;

            let update = match self.streaks.register_contribution(contribution.instant) {
                Ok(update) => Some(update),
                Err(e) => {
                    // Catch-up occurrence older than a manual deposit already counted.
                    debug!("Auto-deposit {} left streak untouched: {}", contribution.id, e);
                    None
                }
            };
            outcomes.push(self.after_streak_step(&contribution, update)?);
        }

        for (goal_id, (count, last_applied)) in applied {
            self.event_sink.emit(DomainEvent::AutoContributionsApplied {
                goal_id,
                count,
                last_applied,
            });
        }
        Ok(outcomes)
    }

    /// Rules whose goal left the ledger can never be applied again.
    fn drop_orphaned_rules(&mut self) -> Result<()> {
        let mut orphaned = Vec::new();
        for rule in self.scheduler.rules() {
            if self.ledger.goal(&rule.goal_id)?.is_none() {
                orphaned.push(rule.goal_id);
            }
        }
        if orphaned.is_empty() {
            return Ok(());
        }
        for goal_id in &orphaned {
            warn!("Dropping auto-contribution rule for missing goal {}", goal_id);
            self.scheduler.remove_rule(goal_id);
        }
        self.repository
            .save_auto_contribution_rules(self.scheduler.rules())
    }

    /// Creates or replaces the recurring rule for a goal.
    ///
    /// Replacing discards the previous rule's progress; the new rule is due
    /// from its own `start_date`.
    pub fn set_auto_contribution_rule(
        &mut self,
        goal_id: Uuid,
        amount: Decimal,
        frequency: Frequency,
        start_date: DateTime<Utc>,
    ) -> Result<AutoContributionRule> {
        let rule = AutoContributionRule::new(goal_id, amount, frequency, start_date)?;
        if self.ledger.goal(&goal_id)?.is_none() {
            return Err(Error::Validation(ValidationError::GoalNotFound(goal_id)));
        }

        self.scheduler.upsert_rule(rule.clone());
        self.repository
            .save_auto_contribution_rules(self.scheduler.rules())?;
        info!(
            "Auto-contribution of {} set for goal {} ({:?})",
            amount, goal_id, frequency
        );
        Ok(rule)
    }

    pub fn remove_auto_contribution_rule(
        &mut self,
        goal_id: &Uuid,
    ) -> Result<Option<AutoContributionRule>> {
        let removed = self.scheduler.remove_rule(goal_id);
        if removed.is_some() {
            self.repository
                .save_auto_contribution_rules(self.scheduler.rules())?;
        }
        Ok(removed)
    }

    /// Trailing-week stats as of the clock's now.
    pub fn compute_week_stats(&self) -> Result<WeekStats> {
        self.week_stats.compute_week_stats(self.clock.now())
    }

    pub fn compute_week_stats_at(&self, now: DateTime<Utc>) -> Result<WeekStats> {
        self.week_stats.compute_week_stats(now)
    }

    /// Locks every badge again. Streak and rules are left untouched.
    pub fn reset_achievements(&self) -> Result<()> {
        self.achievements.reset_all()
    }
}
