//! Nestegg Core - savings progress and gamification rule engine.
//!
//! Turns a stream of deposit events into derived state: consecutive-day
//! streaks with freeze tokens, unlockable badges with evolution stages,
//! recurring auto-contributions with catch-up, and weekly statistics.
//!
//! The crate does no storage of its own. It reads from and writes to a host
//! ledger through [`ledger::LedgerTrait`] and persists its own state through
//! [`storage::EngineStateRepositoryTrait`].

pub mod achievements;
pub mod auto_contributions;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod events;
pub mod goals;
pub mod ledger;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod streaks;
pub mod utils;

pub use engine::{ActivationReport, ContributionOutcome, SavingsEngine};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
