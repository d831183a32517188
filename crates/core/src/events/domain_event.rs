//! Domain event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::achievements::{BadgeCode, EvolutionStage};
use crate::streaks::StreakUpdate;

/// Domain events emitted by the engine after state transitions.
///
/// Hosts translate these into UI refreshes, notifications or analytics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A contribution moved (or failed to move) the streak.
    StreakUpdated {
        update: StreakUpdate,
        current_streak_days: u32,
        freeze_tokens: u32,
    },

    /// A freeze token was added to the pool.
    FreezeTokenGranted { freeze_tokens: u32 },

    /// Badges were unlocked for the first time.
    BadgesUnlocked {
        codes: Vec<BadgeCode>,
        at: DateTime<Utc>,
    },

    /// Unlocked badges moved up to a new evolution stage.
    BadgesEvolved {
        codes: Vec<BadgeCode>,
        stage: EvolutionStage,
    },

    /// Missed recurring occurrences were materialised for a goal.
    AutoContributionsApplied {
        goal_id: Uuid,
        count: usize,
        last_applied: DateTime<Utc>,
    },
}

impl DomainEvent {
    /// Creates a BadgesUnlocked event.
    pub fn badges_unlocked(codes: Vec<BadgeCode>, at: DateTime<Utc>) -> Self {
        Self::BadgesUnlocked { codes, at }
    }

    /// Creates a BadgesEvolved event.
    pub fn badges_evolved(codes: Vec<BadgeCode>, stage: EvolutionStage) -> Self {
        Self::BadgesEvolved { codes, stage }
    }
}
