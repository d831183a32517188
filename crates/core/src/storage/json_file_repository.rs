use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::debug;

use super::codec::{
    decode_rules, decode_streak_state, encode_rules, encode_streak_state,
    AUTO_CONTRIBUTION_RULES_KEY, STREAK_STATE_KEY,
};
use super::storage_traits::EngineStateRepositoryTrait;
use crate::auto_contributions::AutoContributionRule;
use crate::errors::{Error, Result};
use crate::streaks::StreakState;

/// Stores each record as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileEngineStateRepository {
    dir: PathBuf,
}

impl JsonFileEngineStateRepository {
    /// Uses `dir`, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            Error::Repository(format!("cannot create state dir {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temp file and renames, so readers never see half a record.
    fn write(&self, key: &str, contents: &str) -> Result<()> {
        let target = self.path(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &target)?;
        debug!("Saved {}", target.display());
        Ok(())
    }
}

impl EngineStateRepositoryTrait for JsonFileEngineStateRepository {
    fn load_streak_state(&self) -> Result<Option<StreakState>> {
        self.read(STREAK_STATE_KEY)?
            .map(|raw| decode_streak_state(&raw))
            .transpose()
    }

    fn save_streak_state(&self, state: &StreakState) -> Result<()> {
        self.write(STREAK_STATE_KEY, &encode_streak_state(state)?)
    }

    fn load_auto_contribution_rules(&self) -> Result<Vec<AutoContributionRule>> {
        Ok(self
            .read(AUTO_CONTRIBUTION_RULES_KEY)?
            .map(|raw| decode_rules(&raw))
            .transpose()?
            .unwrap_or_default())
    }

    fn save_auto_contribution_rules(&self, rules: &[AutoContributionRule]) -> Result<()> {
        self.write(AUTO_CONTRIBUTION_RULES_KEY, &encode_rules(rules)?)
    }
}
