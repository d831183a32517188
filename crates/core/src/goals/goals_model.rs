//! Goals domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a goal has a finish line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GoalType {
    Fixed,
    Uncapped,
}

/// Domain model representing a savings goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub goal_type: GoalType,
    /// Only meaningful for `GoalType::Fixed`.
    pub target_amount: Option<Decimal>,
    pub saved_amount: Decimal,
    pub deadline: Option<NaiveDate>,
}

impl Goal {
    pub fn fixed(name: impl Into<String>, target_amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            goal_type: GoalType::Fixed,
            target_amount: Some(target_amount),
            saved_amount: Decimal::ZERO,
            deadline: None,
        }
    }

    pub fn uncapped(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            goal_type: GoalType::Uncapped,
            target_amount: None,
            saved_amount: Decimal::ZERO,
            deadline: None,
        }
    }

    /// Target of a fixed goal, if it is strictly positive.
    pub fn positive_target(&self) -> Option<Decimal> {
        match self.goal_type {
            GoalType::Fixed => self.target_amount.filter(|t| *t > Decimal::ZERO),
            GoalType::Uncapped => None,
        }
    }

    /// `saved / target` for fixed goals with a positive target.
    ///
    /// A quotient too large for `Decimal` saturates with the sign of the
    /// saved amount.
    pub fn progress(&self) -> Option<Decimal> {
        self.positive_target().map(|target| {
            self.saved_amount.checked_div(target).unwrap_or(
                if self.saved_amount.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_progress_only_for_positive_fixed_targets() {
        let mut goal = Goal::fixed("Bike", dec!(400));
        goal.saved_amount = dec!(100);
        assert_eq!(goal.progress(), Some(dec!(0.25)));

        goal.target_amount = Some(Decimal::ZERO);
        assert_eq!(goal.progress(), None);

        goal.target_amount = Some(dec!(0.0000000001));
        goal.saved_amount = dec!(79228162514264337593543950);
        assert_eq!(goal.progress(), Some(Decimal::MAX));

        goal.saved_amount = -goal.saved_amount;
        assert_eq!(goal.progress(), Some(Decimal::MIN));

        let mut open = Goal::uncapped("Rainy day");
        open.saved_amount = dec!(50);
        assert_eq!(open.progress(), None);
    }
}
