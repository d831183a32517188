//! Ledger module - the collaborator contract the engine reads from and writes to.

mod ledger_model;
mod ledger_traits;
mod memory_ledger;

pub use ledger_model::{Contribution, ContributionCategory, NewContribution};
pub use ledger_traits::LedgerTrait;
pub use memory_ledger::InMemoryLedger;
