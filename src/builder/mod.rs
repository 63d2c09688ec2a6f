//! Builder API for vending machine construction.
//!
//! Collects the catalog, configuration, scheduler and observer, validates
//! the catalog, and hands back an idle machine.

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::VendingMachineBuilder;
