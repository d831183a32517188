//! JSON encoding of persisted engine records.

use log::warn;
use rust_decimal::Decimal;

use crate::auto_contributions::AutoContributionRule;
use crate::errors::{Error, Result};
use crate::streaks::StreakState;

pub const STREAK_STATE_KEY: &str = "streak_state";
pub const AUTO_CONTRIBUTION_RULES_KEY: &str = "auto_contribution_rules";

pub fn encode_streak_state(state: &StreakState) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

pub fn decode_streak_state(raw: &str) -> Result<StreakState> {
    serde_json::from_str(raw)
        .map_err(|e| Error::Serialization(format!("{}: {}", STREAK_STATE_KEY, e)))
}

pub fn encode_rules(rules: &[AutoContributionRule]) -> Result<String> {
    Ok(serde_json::to_string(rules)?)
}

/// Decodes the stored rule list, dropping records with a non-positive amount.
pub fn decode_rules(raw: &str) -> Result<Vec<AutoContributionRule>> {
    let rules: Vec<AutoContributionRule> = serde_json::from_str(raw)
        .map_err(|e| Error::Serialization(format!("{}: {}", AUTO_CONTRIBUTION_RULES_KEY, e)))?;

    Ok(rules
        .into_iter()
        .filter(|rule| {
            let valid = rule.amount > Decimal::ZERO;
            if !valid {
                warn!(
                    "Dropping stored auto-contribution rule for goal {}: amount {} is not positive",
                    rule.goal_id, rule.amount
                );
            }
            valid
        })
        .collect())
}
