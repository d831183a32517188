//! Recurring contribution rule models.

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ValidationError};
use crate::utils::time_utils::Calendar;

/// How often a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every 7 local calendar days.
    Weekly,
    /// Every calendar month, clamped to the month's last day.
    Monthly,
}

impl Frequency {
    /// The instant one period after `from`, at local `wall_time`.
    pub fn advance(
        &self,
        calendar: &Calendar,
        from: DateTime<Utc>,
        wall_time: NaiveTime,
    ) -> DateTime<Utc> {
        match self {
            Frequency::Weekly => calendar.add_days_at(from, 7, wall_time),
            Frequency::Monthly => calendar.add_months_at(from, 1, wall_time),
        }
    }
}

/// A recurring deposit into one goal. At most one rule exists per goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoContributionRule {
    pub goal_id: Uuid,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub frequency: Frequency,
    pub start_date: DateTime<Utc>,
    /// Last occurrence actually materialised; `None` until the first one.
    pub last_applied: Option<DateTime<Utc>>,
}

impl AutoContributionRule {
    /// Creates a never-applied rule, rejecting non-positive amounts.
    pub fn new(
        goal_id: Uuid,
        amount: Decimal,
        frequency: Frequency,
        start_date: DateTime<Utc>,
    ) -> Result<Self> {
        if amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveAmount(amount).into());
        }
        Ok(Self {
            goal_id,
            amount,
            frequency,
            start_date,
            last_applied: None,
        })
    }

    /// Point the next occurrence is counted from.
    pub fn anchor(&self) -> DateTime<Utc> {
        self.last_applied.unwrap_or(self.start_date)
    }

    /// Next occurrence after `from`, on the start date's local wall-clock time.
    pub fn step(&self, calendar: &Calendar, from: DateTime<Utc>) -> DateTime<Utc> {
        self.frequency
            .advance(calendar, from, calendar.local_time(self.start_date))
    }
}

/// One due occurrence waiting to be materialised as a contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueOccurrence {
    pub goal_id: Uuid,
    pub amount: Decimal,
    pub instant: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_non_positive_amount_is_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        assert!(AutoContributionRule::new(Uuid::new_v4(), dec!(0), Frequency::Weekly, start).is_err());
        assert!(
            AutoContributionRule::new(Uuid::new_v4(), dec!(-5), Frequency::Monthly, start).is_err()
        );
        let rule = AutoContributionRule::new(Uuid::new_v4(), dec!(25), Frequency::Weekly, start).unwrap();
        assert_eq!(rule.anchor(), start);
    }

    #[test]
    fn test_persisted_shape() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let goal_id = Uuid::new_v4();
        let rule = AutoContributionRule::new(goal_id, dec!(12.50), Frequency::Monthly, start).unwrap();
        let json = serde_json::to_value(&rule).unwrap();

        assert_eq!(json["goalId"], goal_id.to_string());
        assert_eq!(json["amount"], "12.50");
        assert_eq!(json["frequency"], "monthly");
        assert_eq!(json["startDate"], "2024-01-01T09:00:00Z");
        assert!(json["lastApplied"].is_null());
    }
}
