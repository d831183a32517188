use std::sync::Arc;

use chrono::{DateTime, Duration, Utc, Weekday};
use rust_decimal::Decimal;

use super::week_stats_model::WeekStats;
use crate::errors::{Result, ValidationError};
use crate::goals::Goal;
use crate::ledger::{Contribution, LedgerTrait};
use crate::utils::time_utils::{weekday_name, Calendar};

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Read-only weekly aggregation over the ledger.
pub struct WeekStatsService {
    ledger: Arc<dyn LedgerTrait>,
    calendar: Calendar,
    window_days: i64,
}

impl WeekStatsService {
    pub fn new(ledger: Arc<dyn LedgerTrait>, calendar: Calendar, window_days: i64) -> Self {
        WeekStatsService {
            ledger,
            calendar,
            window_days,
        }
    }

    /// Stats for contributions with `instant >= now - window`.
    ///
    /// The reference goal is the first fixed goal with a positive target; with
    /// none, `percent_to_goal` is zero.
    pub fn compute_week_stats(&self, now: DateTime<Utc>) -> Result<WeekStats> {
        let since = Duration::try_days(self.window_days)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "stats window of {} days is out of range",
                    self.window_days
                ))
            })?;
        let contributions = self.ledger.contributions_since(since)?;
        let goals = self.ledger.goals()?;

        let total_added = contributions
            .iter()
            .fold(Decimal::ZERO, |sum, c| sum.saturating_add(c.amount));
        let reference = goals.iter().find(|g| g.positive_target().is_some());

        Ok(WeekStats {
            total_added,
            percent_to_goal: reference
                .map(|goal| percent_to_goal(goal, total_added))
                .unwrap_or(Decimal::ZERO),
            best_day: self.best_day(&contributions),
        })
    }

    /// Ties go to the earliest weekday, Monday first.
    fn best_day(&self, contributions: &[Contribution]) -> String {
        let mut totals: [Option<Decimal>; 7] = [None; 7];
        for contribution in contributions {
            let index = self
                .calendar
                .weekday(contribution.instant)
                .num_days_from_monday() as usize;
            let total = totals[index].get_or_insert(Decimal::ZERO);
            *total = total.saturating_add(contribution.amount);
        }

        let mut best: Option<(usize, Decimal)> = None;
        for (index, total) in totals.iter().enumerate() {
            let Some(total) = total else { continue };
            if best.map_or(true, |(_, current)| *total > current) {
                best = Some((index, *total));
            }
        }

        best.map(|(index, _)| weekday_name(WEEK[index]).to_string())
            .unwrap_or_default()
    }
}

fn percent_to_goal(goal: &Goal, total_added: Decimal) -> Decimal {
    let Some(target) = goal.positive_target() else {
        return Decimal::ZERO;
    };
    let remaining = target.saturating_sub(goal.saved_amount).max(Decimal::ZERO);
    if remaining.is_zero() {
        return Decimal::ONE;
    }
    // Only a huge positive total can overflow against a positive remainder.
    total_added
        .checked_div(remaining)
        .unwrap_or(Decimal::ONE)
        .clamp(Decimal::ZERO, Decimal::ONE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{InMemoryLedger, NewContribution};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    // 2024-01-01 is a Monday.
    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    fn service(ledger: &Arc<InMemoryLedger>) -> WeekStatsService {
        WeekStatsService::new(ledger.clone(), Calendar::utc(), 7)
    }

    fn record(ledger: &InMemoryLedger, amount: Decimal, instant: DateTime<Utc>) {
        ledger
            .record_contribution(NewContribution::new(amount, instant))
            .unwrap();
    }

    #[test]
    fn test_monday_tuesday_week() {
        let ledger = Arc::new(InMemoryLedger::new());
        record(&ledger, dec!(100), at(1, 10));
        record(&ledger, dec!(400), at(2, 10));

        let stats = service(&ledger).compute_week_stats(at(4, 12)).unwrap();
        assert_eq!(stats.total_added, dec!(500));
        assert_eq!(stats.best_day, "Tuesday");
        assert_eq!(stats.percent_to_goal, Decimal::ZERO);
    }

    #[test]
    fn test_empty_week_defaults() {
        let ledger = Arc::new(InMemoryLedger::new());
        record(&ledger, dec!(100), at(1, 10));

        let stats = service(&ledger).compute_week_stats(at(20, 12)).unwrap();
        assert_eq!(stats, WeekStats::default());
    }

    #[test]
    fn test_window_start_is_inclusive() {
        let ledger = Arc::new(InMemoryLedger::new());
        record(&ledger, dec!(30), at(1, 12));
        record(&ledger, dec!(5), at(1, 11));

        let stats = service(&ledger).compute_week_stats(at(8, 12)).unwrap();
        assert_eq!(stats.total_added, dec!(30));
    }

    #[test]
    fn test_tie_goes_to_earliest_weekday() {
        let ledger = Arc::new(InMemoryLedger::new());
        record(&ledger, dec!(50), at(5, 10)); // Friday
        record(&ledger, dec!(50), at(3, 10)); // Wednesday

        let stats = service(&ledger).compute_week_stats(at(6, 12)).unwrap();
        assert_eq!(stats.best_day, "Wednesday");
    }

    #[test]
    fn test_percent_to_first_positive_fixed_goal() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.add_goal(Goal::uncapped("Buffer")).unwrap();
        ledger.add_goal(Goal::fixed("Broken", dec!(0))).unwrap();
        let goal = ledger.add_goal(Goal::fixed("Sofa", dec!(1000))).unwrap();
        ledger.add_goal(Goal::fixed("Later", dec!(10))).unwrap();

        ledger
            .record_contribution(NewContribution::new(dec!(200), at(2, 10)).for_goal(goal.id))
            .unwrap();
        // saved = 200, remaining = 800, added this week = 200
        let stats = service(&ledger).compute_week_stats(at(4, 12)).unwrap();
        assert_eq!(stats.percent_to_goal, dec!(0.25));
    }

    #[test]
    fn test_percent_is_one_when_goal_reached() {
        let ledger = Arc::new(InMemoryLedger::new());
        let goal = ledger.add_goal(Goal::fixed("Done", dec!(100))).unwrap();
        ledger
            .record_contribution(NewContribution::new(dec!(150), at(2, 10)).for_goal(goal.id))
            .unwrap();

        let stats = service(&ledger).compute_week_stats(at(4, 12)).unwrap();
        assert_eq!(stats.percent_to_goal, Decimal::ONE);
    }

    #[test]
    fn test_percent_caps_at_one() {
        let ledger = Arc::new(InMemoryLedger::new());
        let goal = ledger.add_goal(Goal::fixed("Sofa", dec!(1000))).unwrap();
        ledger
            .record_contribution(NewContribution::new(dec!(900), at(2, 10)).for_goal(goal.id))
            .unwrap();
        // remaining = 100 but 900 was added this week
        let stats = service(&ledger).compute_week_stats(at(4, 12)).unwrap();
        assert_eq!(stats.percent_to_goal, Decimal::ONE);
    }

    #[test]
    fn test_percent_saturates_when_division_overflows() {
        let ledger = Arc::new(InMemoryLedger::new());
        ledger.add_goal(Goal::fixed("Tiny", dec!(0.0000000002))).unwrap();
        record(&ledger, dec!(79228162514264337593543950), at(2, 10));

        let stats = service(&ledger).compute_week_stats(at(4, 12)).unwrap();
        assert_eq!(stats.percent_to_goal, Decimal::ONE);
    }

    #[test]
    fn test_out_of_range_window_is_an_error() {
        let ledger = Arc::new(InMemoryLedger::new());
        let service = WeekStatsService::new(ledger.clone(), Calendar::utc(), 1_000_000_000);
        assert!(service.compute_week_stats(at(4, 12)).is_err());
    }
}
