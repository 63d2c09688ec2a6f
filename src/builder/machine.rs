//! Builder for constructing vending machines.

use crate::builder::error::BuildError;
use crate::catalog::{Catalog, CatalogItem};
use crate::config::MachineConfig;
use crate::effects::{MachineObserver, NoopObserver, Scheduler, VendingMachine};
use std::time::Duration;

enum CatalogSource {
    Loaded(Catalog),
    Records(Vec<CatalogItem>),
}

/// Builder for constructing vending machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use vendsim::builder::VendingMachineBuilder;
/// use vendsim::catalog::CatalogItem;
/// use vendsim::effects::{ManualScheduler, RecordingObserver};
///
/// let observer = RecordingObserver::new();
/// let machine = VendingMachineBuilder::new(ManualScheduler::new())
///     .items(vec![CatalogItem::new("A1", "Cola", 150, 3)])
///     .dispense_delay(Duration::from_millis(500))
///     .observer(observer.clone())
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.catalog().len(), 1);
/// assert_eq!(machine.dispense_delay(), Duration::from_millis(500));
/// ```
pub struct VendingMachineBuilder<Sch: Scheduler, O: MachineObserver = NoopObserver> {
    catalog: Option<CatalogSource>,
    config: MachineConfig,
    scheduler: Sch,
    observer: O,
}

impl<Sch: Scheduler> VendingMachineBuilder<Sch, NoopObserver> {
    /// Create a new builder around the scheduler that will deliver timers.
    pub fn new(scheduler: Sch) -> Self {
        Self {
            catalog: None,
            config: MachineConfig::default(),
            scheduler,
            observer: NoopObserver,
        }
    }
}

impl<Sch: Scheduler, O: MachineObserver> VendingMachineBuilder<Sch, O> {
    /// Use an already validated catalog.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(CatalogSource::Loaded(catalog));
        self
    }

    /// Use raw records; they are validated by `build`.
    pub fn items(mut self, items: Vec<CatalogItem>) -> Self {
        self.catalog = Some(CatalogSource::Records(items));
        self
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the configured dispense delay.
    pub fn dispense_delay(mut self, delay: Duration) -> Self {
        self.config.dispense_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Cap the number of phase transitions kept in the machine's history.
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Attach an observer, replacing any previous one.
    pub fn observer<O2: MachineObserver>(self, observer: O2) -> VendingMachineBuilder<Sch, O2> {
        VendingMachineBuilder {
            catalog: self.catalog,
            config: self.config,
            scheduler: self.scheduler,
            observer,
        }
    }

    /// Build the machine.
    /// Returns an error if the catalog is missing or invalid.
    pub fn build(self) -> Result<VendingMachine<Sch, O>, BuildError> {
        let catalog = match self.catalog.ok_or(BuildError::MissingCatalog)? {
            CatalogSource::Loaded(catalog) => catalog,
            CatalogSource::Records(items) => Catalog::new(items)?,
        };

        Ok(VendingMachine::from_parts(
            catalog,
            &self.config,
            self.scheduler,
            self.observer,
        ))
    }
}
