//! Consecutive-day streak tracking with monthly freeze tokens.

use chrono::{DateTime, Utc};
use log::{debug, info};

use super::streaks_model::{StreakState, StreakUpdate};
use crate::constants::MAX_FREEZE_TOKENS;
use crate::errors::StreakError;
use crate::utils::time_utils::Calendar;

/// Owns the `StreakState` and is the only thing that mutates it.
///
/// Day arithmetic uses the calendar's local day boundary. Contributions must
/// arrive in non-decreasing timestamp order; anything earlier than the last
/// registered instant is rejected with [`StreakError::OutOfOrder`].
#[derive(Debug, Clone)]
pub struct StreakTracker {
    state: StreakState,
    calendar: Calendar,
    max_freeze_tokens: u32,
}

impl StreakTracker {
    pub fn new(mut state: StreakState, calendar: Calendar, max_freeze_tokens: u32) -> Self {
        let max_freeze_tokens = max_freeze_tokens.min(MAX_FREEZE_TOKENS);
        state.freeze_tokens = state.freeze_tokens.min(max_freeze_tokens);
        Self {
            state,
            calendar,
            max_freeze_tokens,
        }
    }

    pub fn state(&self) -> &StreakState {
        &self.state
    }

    pub fn current_streak_days(&self) -> u32 {
        self.state.current_streak_days
    }

    pub fn freeze_tokens(&self) -> u32 {
        self.state.freeze_tokens
    }

    pub fn last_contribution_instant(&self) -> Option<DateTime<Utc>> {
        self.state.last_contribution_instant
    }

    /// Grants at most one freeze token per calendar month, up to the cap.
    ///
    /// Returns `true` if a token was added. The month is marked as processed
    /// even when the pool is already full, so later calls in the same month
    /// stay no-ops.
    pub fn grant_monthly_freeze_token(&mut self, now: DateTime<Utc>) -> bool {
        let month = self.calendar.year_month(now);
        if self
            .state
            .last_freeze_grant_month
            .is_some_and(|last| last >= month)
        {
            return false;
        }

        self.state.last_freeze_grant_month = Some(month);
        if self.state.freeze_tokens >= self.max_freeze_tokens {
            debug!("Freeze token pool full for {}", month);
            return false;
        }

        self.state.freeze_tokens += 1;
        info!(
            "Granted freeze token for {} ({} banked)",
            month, self.state.freeze_tokens
        );
        true
    }

    pub fn register_contribution(
        &mut self,
        at: DateTime<Utc>,
    ) -> Result<StreakUpdate, StreakError> {
        let update = match self.state.last_contribution_instant {
            None => {
                self.state.current_streak_days = 1;
                StreakUpdate::Started
            }
            Some(last) if at < last => {
                return Err(StreakError::OutOfOrder {
                    last,
                    attempted: at,
                });
            }
            Some(last) => match self.calendar.days_between(last, at) {
                0 => StreakUpdate::SameDay,
                1 => {
                    self.state.current_streak_days += 1;
                    StreakUpdate::Extended
                }
                2 if self.state.freeze_tokens > 0 => {
                    self.state.freeze_tokens -= 1;
                    self.state.current_streak_days += 1;
                    StreakUpdate::FreezeConsumed
                }
                _ => {
                    self.state.current_streak_days = 1;
                    StreakUpdate::Reset
                }
            },
        };

        self.state.last_contribution_instant = Some(at);
        self.state.best_streak_days = self
            .state
            .best_streak_days
            .max(self.state.current_streak_days);

        debug!(
            "Streak {:?}: {} day(s), {} freeze token(s)",
            update, self.state.current_streak_days, self.state.freeze_tokens
        );
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn tracker() -> StreakTracker {
        StreakTracker::new(StreakState::default(), Calendar::utc(), MAX_FREEZE_TOKENS)
    }

    #[test]
    fn test_consecutive_days_extend_streak() {
        let mut t = tracker();
        assert_eq!(t.register_contribution(at(2024, 1, 1, 9)), Ok(StreakUpdate::Started));
        assert_eq!(t.register_contribution(at(2024, 1, 2, 9)), Ok(StreakUpdate::Extended));
        assert_eq!(t.register_contribution(at(2024, 1, 3, 23)), Ok(StreakUpdate::Extended));
        assert_eq!(t.current_streak_days(), 3);
        assert_eq!(t.state().best_streak_days, 3);
    }

    #[test]
    fn test_same_day_is_idempotent_but_advances_instant() {
        let mut t = tracker();
        t.register_contribution(at(2024, 1, 1, 9)).unwrap();
        assert_eq!(t.register_contribution(at(2024, 1, 1, 18)), Ok(StreakUpdate::SameDay));
        assert_eq!(t.current_streak_days(), 1);
        assert_eq!(t.last_contribution_instant(), Some(at(2024, 1, 1, 18)));
    }

    #[test]
    fn test_two_day_gap_spends_token() {
        let mut t = tracker();
        t.grant_monthly_freeze_token(at(2024, 1, 1, 0));
        t.register_contribution(at(2024, 1, 1, 9)).unwrap();
        t.register_contribution(at(2024, 1, 2, 9)).unwrap();

        let update = t.register_contribution(at(2024, 1, 4, 9)).unwrap();
        assert_eq!(update, StreakUpdate::FreezeConsumed);
        assert_eq!(t.current_streak_days(), 3);
        assert_eq!(t.freeze_tokens(), 0);
    }

    #[test]
    fn test_two_day_gap_without_token_resets() {
        let mut t = tracker();
        t.register_contribution(at(2024, 1, 1, 9)).unwrap();
        t.register_contribution(at(2024, 1, 2, 9)).unwrap();
        assert_eq!(t.register_contribution(at(2024, 1, 4, 9)), Ok(StreakUpdate::Reset));
        assert_eq!(t.current_streak_days(), 1);
        assert_eq!(t.state().best_streak_days, 2);
    }

    #[test]
    fn test_three_day_gap_resets_even_with_tokens() {
        let mut t = tracker();
        t.grant_monthly_freeze_token(at(2024, 1, 1, 0));
        t.register_contribution(at(2024, 1, 1, 9)).unwrap();
        assert_eq!(t.register_contribution(at(2024, 1, 5, 9)), Ok(StreakUpdate::Reset));
        assert_eq!(t.freeze_tokens(), 1);
    }

    #[test]
    fn test_out_of_order_is_rejected_without_mutation() {
        let mut t = tracker();
        t.register_contribution(at(2024, 1, 5, 9)).unwrap();
        let before = t.state().clone();
        let err = t.register_contribution(at(2024, 1, 4, 9)).unwrap_err();
        assert!(matches!(err, StreakError::OutOfOrder { .. }));
        assert_eq!(t.state(), &before);
    }

    #[test]
    fn test_freeze_grant_once_per_month_and_capped() {
        let mut t = tracker();
        assert!(t.grant_monthly_freeze_token(at(2024, 1, 3, 0)));
        assert!(!t.grant_monthly_freeze_token(at(2024, 1, 28, 0)));
        assert!(t.grant_monthly_freeze_token(at(2024, 2, 1, 0)));
        assert!(t.grant_monthly_freeze_token(at(2024, 3, 1, 0)));
        assert!(!t.grant_monthly_freeze_token(at(2024, 4, 1, 0)));
        assert_eq!(t.freeze_tokens(), 3);
        assert_eq!(
            t.state().last_freeze_grant_month.map(|m| m.to_string()),
            Some("2024-04".to_string())
        );
    }

    #[test]
    fn test_loaded_state_is_clamped_to_cap() {
        let state = StreakState {
            freeze_tokens: 9,
            ..Default::default()
        };
        let t = StreakTracker::new(state, Calendar::utc(), 2);
        assert_eq!(t.freeze_tokens(), 2);
    }
}
