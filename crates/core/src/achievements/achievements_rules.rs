//! Badge rules evaluated against a freshly registered contribution.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::achievements_model::{BadgeCode, EvolutionStage};
use crate::constants::{GOLDEN_STREAK_DAYS, TEN_CONTRIBUTIONS, WEEK_STREAK_DAYS};
use crate::goals::Goal;
use crate::ledger::Contribution;
use crate::utils::time_utils::Calendar;

/// Engine state the rules may look at besides the triggering event.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Streak after the event was registered.
    pub current_streak_days: u32,
    /// Total contributions ever, the event included.
    pub total_contributions: usize,
    /// Goal the event is linked to, with its current saved total.
    pub goal: Option<&'a Goal>,
}

/// Event facts resolved once in local time and shared by every rule.
struct RuleInput<'a> {
    event: &'a Contribution,
    context: &'a EvaluationContext<'a>,
    local_hour: u32,
    local_weekday: Weekday,
    local_date: NaiveDate,
}

type Rule = fn(&RuleInput<'_>, &mut BTreeSet<BadgeCode>);

const RULES: [Rule; 6] = [
    count_milestones,
    time_of_day,
    calendar_days,
    lucky_amount,
    goal_progress,
    streak_milestones,
];

const GOAL_THRESHOLDS: [(Decimal, BadgeCode); 4] = [
    (dec!(0.25), BadgeCode::Goal25),
    (dec!(0.50), BadgeCode::Goal50),
    (dec!(0.75), BadgeCode::Goal75),
    (dec!(1), BadgeCode::Goal100),
];

/// Pure rule pass mapping an event and engine state to badge codes.
///
/// Returns every satisfied rule, already-unlocked badges included; unlock
/// idempotency is handled where the result is written back.
#[derive(Debug, Clone, Copy, Default)]
pub struct AchievementEvaluator {
    calendar: Calendar,
}

impl AchievementEvaluator {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    pub fn evaluate(
        &self,
        event: &Contribution,
        context: &EvaluationContext<'_>,
    ) -> BTreeSet<BadgeCode> {
        let input = RuleInput {
            event,
            context,
            local_hour: self.calendar.local_hour(event.instant),
            local_weekday: self.calendar.weekday(event.instant),
            local_date: self.calendar.local_date(event.instant),
        };

        let mut codes = BTreeSet::new();
        for rule in RULES {
            rule(&input, &mut codes);
        }
        codes
    }

    /// Stage every unlocked badge should be at for a given streak length.
    pub fn target_evolution(current_streak_days: u32) -> EvolutionStage {
        if current_streak_days >= GOLDEN_STREAK_DAYS {
            EvolutionStage::Stage2
        } else if current_streak_days >= WEEK_STREAK_DAYS {
            EvolutionStage::Stage1
        } else {
            EvolutionStage::Stage0
        }
    }
}

fn count_milestones(input: &RuleInput<'_>, codes: &mut BTreeSet<BadgeCode>) {
    let total = input.context.total_contributions;
    if total == 1 {
        codes.insert(BadgeCode::FirstContribution);
    }
    if total >= TEN_CONTRIBUTIONS {
        codes.insert(BadgeCode::TenContributions);
    }
}

fn streak_milestones(input: &RuleInput<'_>, codes: &mut BTreeSet<BadgeCode>) {
    if input.context.current_streak_days >= WEEK_STREAK_DAYS {
        codes.insert(BadgeCode::WeekStreak);
    }
}

fn time_of_day(input: &RuleInput<'_>, codes: &mut BTreeSet<BadgeCode>) {
    match input.local_hour {
        0 => {
            codes.insert(BadgeCode::LateNight);
        }
        6..=8 => {
            codes.insert(BadgeCode::Morning);
        }
        20..=23 => {
            codes.insert(BadgeCode::Evening);
        }
        _ => {}
    }
}

fn calendar_days(input: &RuleInput<'_>, codes: &mut BTreeSet<BadgeCode>) {
    if input.local_weekday == Weekday::Tue {
        codes.insert(BadgeCode::GenerousTuesday);
    }
    if is_palindrome_date(input.local_date) {
        codes.insert(BadgeCode::PalindromeDate);
    }
}

fn lucky_amount(input: &RuleInput<'_>, codes: &mut BTreeSet<BadgeCode>) {
    if input.event.amount.trunc() % dec!(1000) == dec!(777) {
        codes.insert(BadgeCode::LuckyNumber);
    }
}

fn goal_progress(input: &RuleInput<'_>, codes: &mut BTreeSet<BadgeCode>) {
    let Some(goal) = input.context.goal else {
        return;
    };
    if input.event.goal_id != Some(goal.id) {
        return;
    }
    let Some(progress) = goal.progress() else {
        return;
    };
    for (threshold, code) in GOAL_THRESHOLDS {
        if progress >= threshold {
            codes.insert(code);
        }
    }
}

/// `yyyyMMdd` reads the same backwards.
fn is_palindrome_date(date: NaiveDate) -> bool {
    let digits = date.format("%Y%m%d").to_string();
    digits.len() == 8 && digits.bytes().eq(digits.bytes().rev())
}
