//! Vendsim: a deterministic vending machine controller
//!
//! Vendsim models the control logic of a vending machine: inserted credit,
//! product selection, stock levels, and a timed dispense sequence. The
//! controller is a plain state machine driven by three commands
//! (InsertCoin, SelectItem, Cancel) plus one internal timer event
//! (DispenseComplete). Rendering and input delivery stay outside: the
//! controller takes typed commands and catalog records, and emits
//! snapshots through an observer.
//!
//! # Core Concepts
//!
//! - **Phases**: `Idle` or `Dispensing`; while dispensing every command is ignored
//! - **Eligibility**: Pure check that a selection exists, has stock, and is paid for
//! - **Scheduler**: Injected timer source, so tests move time by hand
//! - **History**: Immutable audit trail of phase transitions
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use vendsim::builder::VendingMachineBuilder;
//! use vendsim::catalog::CatalogItem;
//! use vendsim::effects::ManualScheduler;
//!
//! let mut machine = VendingMachineBuilder::new(ManualScheduler::new())
//!     .items(vec![CatalogItem::new("A1", "Cola", 150, 3)])
//!     .build()
//!     .unwrap();
//!
//! machine.insert_coin(100);
//! machine.select_item("A1");
//! assert_eq!(machine.snapshot().to_string(), "Credit: $1.00\nCola: owed $0.50");
//!
//! machine.insert_coin(100);
//! assert!(machine.state().is_dispensing());
//!
//! machine.advance_time(Duration::from_secs(3));
//! assert_eq!(machine.credit_cents(), 50);
//! assert_eq!(machine.catalog().get(&"A1".into()).unwrap().stock, 2);
//! ```

pub mod builder;
pub mod catalog;
pub mod config;
pub mod core;
pub mod effects;
pub mod money;
pub mod runtime;
pub mod snapshot;
pub mod telemetry;

// Re-export commonly used types
pub use builder::{BuildError, VendingMachineBuilder};
pub use catalog::{Catalog, CatalogItem, ItemId};
pub use self::core::{DispenseState, Eligibility, State, StateHistory, StateTransition};
pub use effects::{Command, CommandOutcome, ManualScheduler, Scheduler, VendingMachine};
pub use snapshot::{Balance, Snapshot};
