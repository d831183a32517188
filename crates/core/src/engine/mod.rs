//! Engine module - the contribution pipeline and activation entry point.

mod engine_model;
mod savings_engine;


pub use engine_model::{ActivationReport, ContributionOutcome};
pub use savings_engine::SavingsEngine;
