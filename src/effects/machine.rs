//! The vending controller.

use crate::catalog::{Catalog, CatalogItem, ItemId};
use crate::config::MachineConfig;
use crate::core::{DispenseState, Eligibility, State, StateHistory, StateTransition};
use crate::effects::command::{Command, CommandOutcome, IgnoreReason};
use crate::effects::observer::{MachineObserver, NoopObserver};
use crate::effects::scheduler::{ManualScheduler, Scheduler, TimerEvent};
use crate::snapshot::Snapshot;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Vending machine controller.
///
/// Owns the catalog, the inserted credit, the current selection and the
/// dispense phase. Commands run to completion one at a time; the only
/// deferred work is the dispense completion, which is handed to the
/// scheduler and comes back through [`VendingMachine::handle_timer`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use vendsim::catalog::{Catalog, CatalogItem};
/// use vendsim::effects::{ManualScheduler, VendingMachine};
///
/// let catalog = Catalog::new(vec![CatalogItem::new("A1", "Cola", 150, 3)]).unwrap();
/// let mut machine = VendingMachine::new(catalog, ManualScheduler::new());
///
/// machine.select_item("A1");
/// machine.insert_coin(100);
/// machine.insert_coin(100);
/// assert!(machine.state().is_dispensing());
///
/// machine.advance_time(Duration::from_secs(3));
/// assert_eq!(machine.credit_cents(), 50);
/// ```
pub struct VendingMachine<Sch: Scheduler, O: MachineObserver = NoopObserver> {
    catalog: Catalog,
    credit_cents: u64,
    selected: Option<ItemId>,
    state: DispenseState,
    history: StateHistory<DispenseState>,
    dispense_delay: Duration,
    scheduler: Sch,
    observer: O,
}

impl<Sch: Scheduler> VendingMachine<Sch, NoopObserver> {
    /// Create an idle machine with default configuration and no observer.
    pub fn new(catalog: Catalog, scheduler: Sch) -> Self {
        Self::from_parts(catalog, &MachineConfig::default(), scheduler, NoopObserver)
    }
}

impl<Sch: Scheduler, O: MachineObserver> VendingMachine<Sch, O> {
    pub(crate) fn from_parts(
        catalog: Catalog,
        config: &MachineConfig,
        scheduler: Sch,
        observer: O,
    ) -> Self {
        Self {
            catalog,
            credit_cents: 0,
            selected: None,
            state: DispenseState::Idle,
            history: StateHistory::with_limit(config.history_limit),
            dispense_delay: config.dispense_delay(),
            scheduler,
            observer,
        }
    }

    /// Dispatch an external command.
    pub fn handle(&mut self, command: Command) -> CommandOutcome {
        match command {
            Command::InsertCoin { amount_cents } => self.insert_coin(amount_cents),
            Command::SelectItem { item_id } => self.select_item(item_id),
            Command::Cancel => self.cancel(),
        }
    }

    /// Add credit. Any amount is accepted; denominations are the coin
    /// mechanism's concern.
    pub fn insert_coin(&mut self, amount_cents: u32) -> CommandOutcome {
        if let Some(ignored) = self.lockout("insert_coin") {
            return ignored;
        }

        self.credit_cents = self.credit_cents.saturating_add(u64::from(amount_cents));
        debug!(amount_cents, credit_cents = self.credit_cents, "coin inserted");
        self.publish_snapshot();
        self.try_dispense();
        CommandOutcome::Applied
    }

    /// Select a product slot. An out-of-stock item is still selected so the
    /// panel can say so, but it never becomes eligible.
    pub fn select_item(&mut self, item_id: impl Into<ItemId>) -> CommandOutcome {
        let item_id = item_id.into();
        if let Some(ignored) = self.lockout("select_item") {
            return ignored;
        }

        if !self.catalog.contains(&item_id) {
            debug!(%item_id, "unknown item selected");
            return CommandOutcome::Ignored(IgnoreReason::UnknownItem);
        }

        debug!(%item_id, "item selected");
        self.selected = Some(item_id);
        self.publish_snapshot();
        self.try_dispense();
        CommandOutcome::Applied
    }

    /// Return all credit and clear the selection.
    pub fn cancel(&mut self) -> CommandOutcome {
        if let Some(ignored) = self.lockout("cancel") {
            return ignored;
        }

        debug!(refunded_cents = self.credit_cents, "cancelled");
        self.credit_cents = 0;
        self.selected = None;
        self.publish_snapshot();
        CommandOutcome::Applied
    }

    /// Deliver a scheduled event.
    pub fn handle_timer(&mut self, event: TimerEvent) -> CommandOutcome {
        match event {
            TimerEvent::DispenseComplete { receipt } => self.complete_dispense(receipt),
        }
    }

    /// Evaluate dispense eligibility without acting on it.
    pub fn eligibility(&self) -> Eligibility {
        Eligibility::evaluate(self.credit_cents, self.selected_item())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.credit_cents, self.selected_item(), &self.state)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn credit_cents(&self) -> u64 {
        self.credit_cents
    }

    pub fn selected_item_id(&self) -> Option<&ItemId> {
        self.selected.as_ref()
    }

    pub fn selected_item(&self) -> Option<&CatalogItem> {
        self.selected.as_ref().and_then(|id| self.catalog.get(id))
    }

    pub fn state(&self) -> &DispenseState {
        &self.state
    }

    pub fn history(&self) -> &StateHistory<DispenseState> {
        &self.history
    }

    pub fn dispense_delay(&self) -> Duration {
        self.dispense_delay
    }

    pub fn scheduler(&self) -> &Sch {
        &self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn lockout(&self, command: &'static str) -> Option<CommandOutcome> {
        if self.state.accepts_commands() {
            return None;
        }
        debug!(command, "ignored while dispensing");
        Some(CommandOutcome::Ignored(IgnoreReason::Dispensing))
    }

    fn try_dispense(&mut self) -> Eligibility {
        let eligibility = self.eligibility();
        if !eligibility.is_ready() {
            debug!(?eligibility, "not dispensing");
            return eligibility;
        }

        let Some(item_id) = self.selected.clone() else {
            return Eligibility::NoSelection;
        };
        let Some(stock) = self.catalog.take_one(&item_id) else {
            return Eligibility::OutOfStock;
        };

        let receipt = Uuid::new_v4();
        self.transition(DispenseState::Dispensing {
            item_id: item_id.clone(),
            receipt,
        });
        info!(%item_id, %receipt, stock, credit_cents = self.credit_cents, "dispense started");

        self.observer.on_stock_changed(&item_id, stock);
        self.scheduler
            .schedule(self.dispense_delay, TimerEvent::DispenseComplete { receipt });
        self.publish_snapshot();
        eligibility
    }

    fn complete_dispense(&mut self, receipt: Uuid) -> CommandOutcome {
        let item_id = match &self.state {
            DispenseState::Dispensing {
                item_id,
                receipt: pending,
            } if *pending == receipt => item_id.clone(),
            _ => {
                warn!(%receipt, state = self.state.name(), "stale dispense timer");
                return CommandOutcome::Ignored(IgnoreReason::StaleTimer);
            }
        };

        // The catalog is never resized, so the dispensing item is always present.
        let (price_cents, stock) = self
            .catalog
            .get(&item_id)
            .map_or((0, 0), |item| (item.price_cents, item.stock));

        self.credit_cents = self.credit_cents.saturating_sub(u64::from(price_cents));
        if stock == 0 {
            self.selected = None;
        }
        self.transition(DispenseState::Idle);
        info!(%item_id, %receipt, price_cents, credit_cents = self.credit_cents, "dispense complete");

        self.publish_snapshot();
        CommandOutcome::Applied
    }

    fn transition(&mut self, to: DispenseState) {
        let from = std::mem::replace(&mut self.state, to.clone());
        let timestamp = self.scheduler.timestamp();
        self.history.record(StateTransition {
            from,
            to,
            timestamp,
        });
    }

    fn publish_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.observer.on_snapshot_changed(&snapshot);
    }
}

impl<O: MachineObserver> VendingMachine<ManualScheduler, O> {
    /// Move virtual time forward and deliver every timer that became due.
    /// Returns the number of events delivered.
    pub fn advance_time(&mut self, by: Duration) -> usize {
        let due = self.scheduler.advance(by);
        let fired = due.len();
        for event in due {
            self.handle_timer(event);
        }
        fired
    }
}
