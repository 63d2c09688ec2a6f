//! Core vending state machine types and logic.
//!
//! This module contains the pure part of the controller:
//! - Phase definitions via the `State` trait and `DispenseState`
//! - The dispense eligibility predicate
//! - Immutable history tracking
//!
//! Nothing here performs I/O, schedules timers, or notifies observers.

mod eligibility;
mod history;
mod state;

pub use eligibility::Eligibility;
pub use history::{StateHistory, StateTransition};
pub use state::{DispenseState, State};
