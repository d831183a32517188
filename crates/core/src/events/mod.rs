//! Domain events module.
//!
//! Provides domain event types and the sink trait the engine emits through
//! after streak, badge and scheduler transitions.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
