//! Catch-up scheduler for recurring contributions.

use chrono::{DateTime, Utc};
use log::debug;
use uuid::Uuid;

use super::auto_contributions_model::{AutoContributionRule, DueOccurrence};
use crate::utils::time_utils::Calendar;

/// Holds the rule set and enumerates missed occurrences.
///
/// Occurrences are the instants strictly after a rule's anchor
/// (`last_applied`, else `start_date`), stepping one period at a time, up to
/// and including `now`. Advancing `last_applied` to the last emitted
/// occurrence is what makes repeated catch-ups free of gaps and duplicates.
#[derive(Debug, Clone, Default)]
pub struct AutoContributionScheduler {
    rules: Vec<AutoContributionRule>,
    calendar: Calendar,
}

impl AutoContributionScheduler {
    pub fn new(rules: Vec<AutoContributionRule>, calendar: Calendar) -> Self {
        let mut scheduler = Self {
            rules: Vec::with_capacity(rules.len()),
            calendar,
        };
        // Collapse duplicates from older persisted sets; the last one wins.
        for rule in rules {
            scheduler.upsert_rule(rule);
        }
        scheduler
    }

    pub fn rules(&self) -> &[AutoContributionRule] {
        &self.rules
    }

    pub fn rule(&self, goal_id: &Uuid) -> Option<&AutoContributionRule> {
        self.rules.iter().find(|r| &r.goal_id == goal_id)
    }

    /// Inserts a rule, replacing (and forgetting the progress of) any rule
    /// already attached to the same goal.
    pub fn upsert_rule(&mut self, rule: AutoContributionRule) {
        match self.rules.iter_mut().find(|r| r.goal_id == rule.goal_id) {
            Some(existing) => {
                debug!("Replacing auto-contribution rule for goal {}", rule.goal_id);
                *existing = rule;
            }
            None => self.rules.push(rule),
        }
    }

    pub fn remove_rule(&mut self, goal_id: &Uuid) -> Option<AutoContributionRule> {
        let index = self.rules.iter().position(|r| &r.goal_id == goal_id)?;
        Some(self.rules.remove(index))
    }

    /// Strictly increasing occurrences of `rule` in `(anchor, up_to]`.
    pub fn due_occurrences(
        &self,
        rule: &AutoContributionRule,
        up_to: DateTime<Utc>,
    ) -> Vec<DateTime<Utc>> {
        let mut occurrences = Vec::new();
        if rule.start_date > up_to {
            return occurrences;
        }

        let mut cursor = rule.anchor();
        loop {
            let next = rule.step(&self.calendar, cursor);
            if next <= cursor || next > up_to {
                break;
            }
            occurrences.push(next);
            cursor = next;
        }
        occurrences
    }

    /// The next instant `rule` will fire, whether or not it is due yet.
    pub fn next_due(&self, rule: &AutoContributionRule) -> DateTime<Utc> {
        rule.step(&self.calendar, rule.anchor())
    }

    /// Every due occurrence across all rules, in chronological order.
    ///
    /// Ties keep rule order, so the result is deterministic.
    pub fn due_schedule(&self, now: DateTime<Utc>) -> Vec<DueOccurrence> {
        let mut schedule: Vec<DueOccurrence> = self
            .rules
            .iter()
            .flat_map(|rule| {
                self.due_occurrences(rule, now)
                    .into_iter()
                    .map(move |instant| DueOccurrence {
                        goal_id: rule.goal_id,
                        amount: rule.amount,
                        instant,
                    })
            })
            .collect();
        schedule.sort_by_key(|o| o.instant);
        schedule
    }

    /// Records that the occurrence at `instant` was emitted for `goal_id`.
    pub fn mark_applied(&mut self, goal_id: &Uuid, instant: DateTime<Utc>) {
        if let Some(rule) = self.rules.iter_mut().find(|r| &r.goal_id == goal_id) {
            rule.last_applied = Some(rule.last_applied.map_or(instant, |last| last.max(instant)));
        }
    }
}
