//! The controller shell around the pure core.
//!
//! The core decides; this module acts. It mutates the catalog, schedules the
//! dispense completion, and notifies observers.
//!
//! # Key Concepts
//!
//! - **Commands**: InsertCoin, SelectItem and Cancel, each returning a `CommandOutcome`
//! - **Scheduler**: Delivers the deferred `TimerEvent`; swap in `ManualScheduler` for tests
//! - **Observer**: Receives snapshots and stock changes for rendering

mod command;
mod machine;
mod observer;
mod scheduler;

pub use command::{Command, CommandOutcome, IgnoreReason};
pub use machine::VendingMachine;
pub use observer::{MachineObserver, NoopObserver, RecordingObserver};
pub use scheduler::{ManualScheduler, Scheduler, TimerEvent};

pub(crate) use scheduler::offset_from;
