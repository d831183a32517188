//! Achievement (badge) domain models and the badge catalogue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of a badge.
///
/// The serialized snake_case value is the persisted code and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCode {
    FirstContribution,
    TenContributions,
    WeekStreak,
    LateNight,
    Morning,
    Evening,
    GenerousTuesday,
    PalindromeDate,
    LuckyNumber,
    #[serde(rename = "goal_25")]
    Goal25,
    #[serde(rename = "goal_50")]
    Goal50,
    #[serde(rename = "goal_75")]
    Goal75,
    #[serde(rename = "goal_100")]
    Goal100,
}

impl BadgeCode {
    pub const ALL: [BadgeCode; 13] = [
        BadgeCode::FirstContribution,
        BadgeCode::TenContributions,
        BadgeCode::WeekStreak,
        BadgeCode::LateNight,
        BadgeCode::Morning,
        BadgeCode::Evening,
        BadgeCode::GenerousTuesday,
        BadgeCode::PalindromeDate,
        BadgeCode::LuckyNumber,
        BadgeCode::Goal25,
        BadgeCode::Goal50,
        BadgeCode::Goal75,
        BadgeCode::Goal100,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeCode::FirstContribution => "first_contribution",
            BadgeCode::TenContributions => "ten_contributions",
            BadgeCode::WeekStreak => "week_streak",
            BadgeCode::LateNight => "late_night",
            BadgeCode::Morning => "morning",
            BadgeCode::Evening => "evening",
            BadgeCode::GenerousTuesday => "generous_tuesday",
            BadgeCode::PalindromeDate => "palindrome_date",
            BadgeCode::LuckyNumber => "lucky_number",
            BadgeCode::Goal25 => "goal_25",
            BadgeCode::Goal50 => "goal_50",
            BadgeCode::Goal75 => "goal_75",
            BadgeCode::Goal100 => "goal_100",
        }
    }
}

impl fmt::Display for BadgeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Ordered evolution tier shared by every unlocked badge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum EvolutionStage {
    /// "chick"
    #[default]
    Stage0,
    /// "hen"
    Stage1,
    /// "golden"
    Stage2,
}

impl EvolutionStage {
    pub fn label(&self) -> &'static str {
        match self {
            EvolutionStage::Stage0 => "chick",
            EvolutionStage::Stage1 => "hen",
            EvolutionStage::Stage2 => "golden",
        }
    }
}

/// A badge in the catalogue together with its unlock state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub code: BadgeCode,
    pub title: String,
    pub description: String,
    pub rarity: BadgeRarity,
    pub evolution: EvolutionStage,
    pub obtained_at: Option<DateTime<Utc>>,
}

impl Badge {
    pub fn is_unlocked(&self) -> bool {
        self.obtained_at.is_some()
    }
}

/// Returns the full catalogue, locked and at `Stage0`, in display order.
pub fn badge_catalog() -> Vec<Badge> {
    BadgeCode::ALL
        .iter()
        .map(|code| {
            let (title, description, rarity) = describe(*code);
            Badge {
                code: *code,
                title: title.to_string(),
                description: description.to_string(),
                rarity,
                evolution: EvolutionStage::Stage0,
                obtained_at: None,
            }
        })
        .collect()
}

fn describe(code: BadgeCode) -> (&'static str, &'static str, BadgeRarity) {
    match code {
        BadgeCode::FirstContribution => (
            "First Egg",
            "Recorded your very first contribution.",
            BadgeRarity::Common,
        ),
        BadgeCode::TenContributions => (
            "Habit Forming",
            "Recorded ten contributions.",
            BadgeRarity::Common,
        ),
        BadgeCode::WeekStreak => (
            "One-Week Streak",
            "Saved something seven days in a row.",
            BadgeRarity::Rare,
        ),
        BadgeCode::LateNight => (
            "Night Owl",
            "Saved between midnight and 1am.",
            BadgeRarity::Rare,
        ),
        BadgeCode::Morning => (
            "Early Bird",
            "Saved between 6am and 9am.",
            BadgeRarity::Common,
        ),
        BadgeCode::Evening => (
            "Evening Saver",
            "Saved after 8pm.",
            BadgeRarity::Common,
        ),
        BadgeCode::GenerousTuesday => (
            "Generous Tuesday",
            "Saved on a Tuesday.",
            BadgeRarity::Common,
        ),
        BadgeCode::PalindromeDate => (
            "Palindrome Day",
            "Saved on a date that reads the same backwards.",
            BadgeRarity::Legendary,
        ),
        BadgeCode::LuckyNumber => (
            "Lucky Sevens",
            "Saved an amount ending in 777.",
            BadgeRarity::Epic,
        ),
        BadgeCode::Goal25 => (
            "Quarter Way",
            "Reached 25% of a goal.",
            BadgeRarity::Common,
        ),
        BadgeCode::Goal50 => ("Halfway", "Reached 50% of a goal.", BadgeRarity::Rare),
        BadgeCode::Goal75 => (
            "Home Stretch",
            "Reached 75% of a goal.",
            BadgeRarity::Rare,
        ),
        BadgeCode::Goal100 => (
            "Goal Complete",
            "Fully funded a goal.",
            BadgeRarity::Epic,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_covers_every_code_once() {
        let catalog = badge_catalog();
        assert_eq!(catalog.len(), BadgeCode::ALL.len());
        assert!(catalog.iter().all(|b| !b.is_unlocked()));
        assert!(catalog.iter().all(|b| b.evolution == EvolutionStage::Stage0));
    }

    #[test]
    fn test_code_serializes_as_stable_string() {
        let json = serde_json::to_string(&BadgeCode::GenerousTuesday).unwrap();
        assert_eq!(json, "\"generous_tuesday\"");
        for code in BadgeCode::ALL {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json.trim_matches('"'), code.as_str());
        }
    }

    #[test]
    fn test_evolution_stages_are_ordered() {
        assert!(EvolutionStage::Stage0 < EvolutionStage::Stage1);
        assert!(EvolutionStage::Stage1 < EvolutionStage::Stage2);
        assert_eq!(EvolutionStage::Stage2.label(), "golden");
    }
}
