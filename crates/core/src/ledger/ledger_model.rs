//! Contribution records owned by the ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed set of contribution categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContributionCategory {
    #[default]
    Savings,
    Salary,
    Gift,
    Windfall,
    /// Materialised by the recurring scheduler.
    AutoDeposit,
    Other,
}

/// An immutable money movement recorded in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    pub id: Uuid,
    pub instant: DateTime<Utc>,
    /// Positive for deposits, negative for withdrawals.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub goal_id: Option<Uuid>,
    pub note: Option<String>,
    pub category: ContributionCategory,
}

/// Input model for recording a new contribution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub goal_id: Option<Uuid>,
    pub note: Option<String>,
    pub category: ContributionCategory,
    pub instant: DateTime<Utc>,
}

impl NewContribution {
    pub fn new(amount: Decimal, instant: DateTime<Utc>) -> Self {
        Self {
            amount,
            goal_id: None,
            note: None,
            category: ContributionCategory::default(),
            instant,
        }
    }

    pub fn for_goal(mut self, goal_id: Uuid) -> Self {
        self.goal_id = Some(goal_id);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_category(mut self, category: ContributionCategory) -> Self {
        self.category = category;
        self
    }
}
