use serde::{Deserialize, Serialize};

use crate::constants::{
    AUTO_DEPOSIT_NOTE, DEFAULT_TIMEZONE, MAX_FREEZE_TOKENS, MAX_STATS_WINDOW_DAYS, STATS_WINDOW_DAYS,
};
use crate::errors::{Result, ValidationError};
use crate::utils::time_utils::Calendar;

/// Engine configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    /// IANA zone name used for local day boundaries.
    pub timezone: String,
    pub max_freeze_tokens: u32,
    pub auto_deposit_note: String,
    pub stats_window_days: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            max_freeze_tokens: MAX_FREEZE_TOKENS,
            auto_deposit_note: AUTO_DEPOSIT_NOTE.to_string(),
            stats_window_days: STATS_WINDOW_DAYS,
        }
    }
}

impl EngineSettings {
    /// Builds settings from flat `(key, value)` rows.
    ///
    /// Unknown keys are ignored and unparsable values keep their default.
    pub fn from_key_values<I, K, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut settings = EngineSettings::default();

        for (key, value) in rows {
            let value = value.as_ref();
            match key.as_ref() {
                "timezone" => settings.timezone = value.to_string(),
                "max_freeze_tokens" => {
                    settings.max_freeze_tokens = value.parse().unwrap_or(MAX_FREEZE_TOKENS);
                }
                "auto_deposit_note" => settings.auto_deposit_note = value.to_string(),
                "stats_window_days" => {
                    settings.stats_window_days = value.parse().unwrap_or(STATS_WINDOW_DAYS);
                }
                _ => {} // Ignore unknown settings
            }
        }

        settings
    }

    pub fn validate(&self) -> Result<()> {
        self.calendar()?;
        if self.max_freeze_tokens > MAX_FREEZE_TOKENS {
            return Err(ValidationError::InvalidInput(format!(
                "max_freeze_tokens must be at most {}, got {}",
                MAX_FREEZE_TOKENS, self.max_freeze_tokens
            ))
            .into());
        }
        if !(1..=MAX_STATS_WINDOW_DAYS).contains(&self.stats_window_days) {
            return Err(ValidationError::InvalidInput(format!(
                "stats_window_days must be between 1 and {}, got {}",
                MAX_STATS_WINDOW_DAYS, self.stats_window_days
            ))
            .into());
        }
        Ok(())
    }

    pub fn calendar(&self) -> Result<Calendar> {
        Calendar::from_name(&self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_values_ignores_unknown_and_bad_values() {
        let settings = EngineSettings::from_key_values([
            ("timezone", "Europe/Madrid"),
            ("max_freeze_tokens", "two"),
            ("stats_window_days", "14"),
            ("theme", "dark"),
        ]);

        assert_eq!(settings.timezone, "Europe/Madrid");
        assert_eq!(settings.max_freeze_tokens, MAX_FREEZE_TOKENS);
        assert_eq!(settings.stats_window_days, 14);
        assert_eq!(settings.auto_deposit_note, AUTO_DEPOSIT_NOTE);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut settings = EngineSettings {
            max_freeze_tokens: 5,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        settings.max_freeze_tokens = 1;
        settings.timezone = "Nowhere/Land".to_string();
        assert!(settings.validate().is_err());

        settings.timezone = "UTC".to_string();
        settings.stats_window_days = 0;
        assert!(settings.validate().is_err());

        settings.stats_window_days = 1_000_000_000;
        assert!(settings.validate().is_err());

        settings.stats_window_days = MAX_STATS_WINDOW_DAYS;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_json_uses_defaults() {
        let settings: EngineSettings = serde_json::from_str(r#"{"maxFreezeTokens":2}"#).unwrap();
        assert_eq!(settings.max_freeze_tokens, 2);
        assert_eq!(settings.timezone, DEFAULT_TIMEZONE);
    }
}
