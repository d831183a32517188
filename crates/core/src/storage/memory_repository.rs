use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::codec::{
    decode_rules, decode_streak_state, encode_rules, encode_streak_state,
    AUTO_CONTRIBUTION_RULES_KEY, STREAK_STATE_KEY,
};
use super::storage_traits::EngineStateRepositoryTrait;
use crate::auto_contributions::AutoContributionRule;
use crate::errors::{Error, Result};
use crate::streaks::StreakState;

/// Key/value repository holding the serialized records in memory.
///
/// Records go through the same JSON codec as the file repository, so a
/// reload exercises the persisted format.
#[derive(Debug, Default)]
pub struct InMemoryEngineStateRepository {
    records: Mutex<HashMap<&'static str, String>>,
}

impl InMemoryEngineStateRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text for `key`, if any.
    pub fn raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.records()?.get(key).cloned())
    }

    /// Overwrites a record with arbitrary text.
    pub fn put_raw(&self, key: &'static str, value: impl Into<String>) -> Result<()> {
        self.records()?.insert(key, value.into());
        Ok(())
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<&'static str, String>>> {
        self.records
            .lock()
            .map_err(|e| Error::Repository(format!("state store lock poisoned: {}", e)))
    }
}

impl EngineStateRepositoryTrait for InMemoryEngineStateRepository {
    fn load_streak_state(&self) -> Result<Option<StreakState>> {
        self.raw(STREAK_STATE_KEY)?
            .map(|raw| decode_streak_state(&raw))
            .transpose()
    }

    fn save_streak_state(&self, state: &StreakState) -> Result<()> {
        self.put_raw(STREAK_STATE_KEY, encode_streak_state(state)?)
    }

    fn load_auto_contribution_rules(&self) -> Result<Vec<AutoContributionRule>> {
        Ok(self
            .raw(AUTO_CONTRIBUTION_RULES_KEY)?
            .map(|raw| decode_rules(&raw))
            .transpose()?
            .unwrap_or_default())
    }

    fn save_auto_contribution_rules(&self, rules: &[AutoContributionRule]) -> Result<()> {
        self.put_raw(AUTO_CONTRIBUTION_RULES_KEY, encode_rules(rules)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_repository_loads_nothing() {
        let repo = InMemoryEngineStateRepository::new();
        assert_eq!(repo.load_streak_state().unwrap(), None);
        assert!(repo.load_auto_contribution_rules().unwrap().is_empty());
    }

    #[test]
    fn test_streak_round_trip_and_corruption() {
        let repo = InMemoryEngineStateRepository::new();
        let state = StreakState {
            current_streak_days: 5,
            freeze_tokens: 1,
            ..Default::default()
        };
        repo.save_streak_state(&state).unwrap();
        assert_eq!(repo.load_streak_state().unwrap(), Some(state));

        repo.put_raw(STREAK_STATE_KEY, "][").unwrap();
        assert!(repo.load_streak_state().is_err());
    }
}
