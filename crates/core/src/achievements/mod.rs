//! Achievements module - badge catalogue, unlock rules and evolution.

mod achievements_model;
mod achievements_rules;
mod achievements_service;

pub use achievements_model::{badge_catalog, Badge, BadgeCode, BadgeRarity, EvolutionStage};
pub use achievements_rules::{AchievementEvaluator, EvaluationContext};
pub use achievements_service::{AchievementOutcome, AchievementService};
