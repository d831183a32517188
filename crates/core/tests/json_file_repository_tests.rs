//! Persistence round-trips through the JSON file repository.

use std::fs;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use nestegg_core::auto_contributions::Frequency;
use nestegg_core::goals::Goal;
use nestegg_core::ledger::{InMemoryLedger, NewContribution};
use nestegg_core::settings::EngineSettings;
use nestegg_core::storage::{EngineStateRepositoryTrait, JsonFileEngineStateRepository};
use nestegg_core::utils::FixedClock;
use nestegg_core::SavingsEngine;
use rust_decimal_macros::dec;
use tempfile::tempdir;

#[test]
fn test_state_survives_restart() {
    let dir = tempdir().unwrap();
    let ledger = Arc::new(InMemoryLedger::new());
    let goal = ledger.add_goal(Goal::fixed("Bike", dec!(600))).unwrap();
    let start = Utc.with_ymd_and_hms(2024, 6, 3, 18, 0, 0).unwrap();
    let clock = Arc::new(FixedClock::new(start));

    {
        let repo = Arc::new(JsonFileEngineStateRepository::new(dir.path()).unwrap());
        let mut engine =
            SavingsEngine::new(ledger.clone(), repo, clock.clone(), EngineSettings::default())
                .unwrap();
        engine
            .set_auto_contribution_rule(goal.id, dec!(12.34), Frequency::Weekly, start)
            .unwrap();
        engine
            .record_contribution(NewContribution::new(dec!(40), start).for_goal(goal.id))
            .unwrap();
        clock.set(start + Duration::days(8));
        engine.activate().unwrap();
    }

    let repo = Arc::new(JsonFileEngineStateRepository::new(dir.path()).unwrap());
    let rules = repo.load_auto_contribution_rules().unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].amount, dec!(12.34));
    assert_eq!(rules[0].last_applied, Some(start + Duration::days(7)));

    let raw = fs::read_to_string(dir.path().join("auto_contribution_rules.json")).unwrap();
    assert!(raw.contains("\"amount\":\"12.34\""));
    assert!(raw.contains("\"frequency\":\"weekly\""));

    let engine = SavingsEngine::new(ledger, repo, clock, EngineSettings::default()).unwrap();
    assert_eq!(
        engine.next_due(&goal.id),
        Some(start + Duration::days(14))
    );
    assert_eq!(engine.streak_state().freeze_tokens, 1);
    assert_eq!(
        engine.streak_state().last_contribution_instant,
        Some(start + Duration::days(7))
    );
}

#[test]
fn test_missing_files_load_as_empty_and_corrupt_files_error() {
    let dir = tempdir().unwrap();
    let repo = JsonFileEngineStateRepository::new(dir.path().join("state")).unwrap();
    assert_eq!(repo.load_streak_state().unwrap(), None);
    assert!(repo.load_auto_contribution_rules().unwrap().is_empty());

    fs::write(repo.dir().join("streak_state.json"), "{\"currentStreakDays\": -1}").unwrap();
    assert!(repo.load_streak_state().is_err());
}
