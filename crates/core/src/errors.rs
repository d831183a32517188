//! Core error types for the savings engine.
//!
//! This module defines storage-agnostic error types. Ledger and repository
//! implementations convert their own failures into these variants so the
//! engine never depends on a particular storage technology.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
///
/// Every failure is local and recoverable: the engine is a computation layer
/// over data the host owns, so nothing here should take the host down.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Streak update rejected: {0}")]
    Streak(#[from] StreakError),

    #[error("Ledger operation failed: {0}")]
    Ledger(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Failed to (de)serialize persisted state: {0}")]
    Serialization(String),
}

/// Validation errors for rule parameters and settings.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("Goal {0} does not exist")]
    GoalNotFound(Uuid),

    #[error("Unknown time zone '{0}'")]
    UnknownTimezone(String),
}

/// Contract violations detected by the streak tracker.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreakError {
    /// Contributions must be registered in non-decreasing timestamp order.
    #[error("contribution at {attempted} is earlier than the last registered one at {last}")]
    OutOfOrder {
        last: DateTime<Utc>,
        attempted: DateTime<Utc>,
    },
}

// === From implementations for common error types ===

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Repository(err.to_string())
    }
}
