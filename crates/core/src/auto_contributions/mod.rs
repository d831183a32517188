//! Auto-contributions module - recurring deposit rules and their catch-up scheduler.

mod auto_contributions_model;
mod scheduler;

pub use auto_contributions_model::{AutoContributionRule, DueOccurrence, Frequency};
pub use scheduler::AutoContributionScheduler;
