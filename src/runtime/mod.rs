//! Tokio runtime adapter.
//!
//! Runs one controller as a serialized actor: a single task owns the
//! machine and processes mailbox messages and timer events one at a time.
//! Callers talk to it through a clonable [`MachineHandle`].
//!
//! # Example
//!
//! ```rust
//! use vendsim::catalog::{Catalog, CatalogItem};
//! use vendsim::config::MachineConfig;
//! use vendsim::runtime;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new(vec![CatalogItem::new("A1", "Cola", 150, 3)])?;
//! let handle = runtime::spawn(catalog, MachineConfig::default());
//!
//! handle.insert_coin(100).await?;
//! assert_eq!(handle.snapshot().await?.credit_cents, 100);
//! # Ok(())
//! # }
//! ```

mod observer;
mod scheduler;

pub use observer::{StockChange, WatchObserver};
pub use scheduler::TokioScheduler;

use crate::catalog::{Catalog, ItemId};
use crate::config::MachineConfig;
use crate::effects::{Command, CommandOutcome, TimerEvent, VendingMachine};
use crate::snapshot::Snapshot;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info};

const MAILBOX_CAPACITY: usize = 64;
const STOCK_CHANNEL_CAPACITY: usize = 32;

/// Errors returned by [`MachineHandle`].
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("vending machine actor has stopped")]
    Closed,
}

enum Message {
    Command {
        command: Command,
        response: oneshot::Sender<CommandOutcome>,
    },
    Snapshot {
        response: oneshot::Sender<Snapshot>,
    },
}

type Machine = VendingMachine<TokioScheduler, WatchObserver>;

/// Clonable handle to a running machine actor.
#[derive(Clone, Debug)]
pub struct MachineHandle {
    mailbox: mpsc::Sender<Message>,
    snapshots: watch::Receiver<Snapshot>,
    stock: broadcast::Sender<StockChange>,
}

impl MachineHandle {
    pub async fn send(&self, command: Command) -> Result<CommandOutcome, RuntimeError> {
        let (response, rx) = oneshot::channel();
        self.mailbox
            .send(Message::Command { command, response })
            .await
            .map_err(|_| RuntimeError::Closed)?;
        rx.await.map_err(|_| RuntimeError::Closed)
    }

    pub async fn insert_coin(&self, amount_cents: u32) -> Result<CommandOutcome, RuntimeError> {
        self.send(Command::InsertCoin { amount_cents }).await
    }

    pub async fn select_item(
        &self,
        item_id: impl Into<ItemId>,
    ) -> Result<CommandOutcome, RuntimeError> {
        self.send(Command::SelectItem {
            item_id: item_id.into(),
        })
        .await
    }

    pub async fn cancel(&self) -> Result<CommandOutcome, RuntimeError> {
        self.send(Command::Cancel).await
    }

    /// Ask the actor for its current snapshot.
    pub async fn snapshot(&self) -> Result<Snapshot, RuntimeError> {
        let (response, rx) = oneshot::channel();
        self.mailbox
            .send(Message::Snapshot { response })
            .await
            .map_err(|_| RuntimeError::Closed)?;
        rx.await.map_err(|_| RuntimeError::Closed)
    }

    /// Receiver that always holds the most recently published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Receiver for stock changes published after this call.
    pub fn subscribe_stock(&self) -> broadcast::Receiver<StockChange> {
        self.stock.subscribe()
    }
}

/// Start a machine actor on the current tokio runtime.
pub fn spawn(catalog: Catalog, config: MachineConfig) -> MachineHandle {
    let (mailbox, inbox) = mpsc::channel(MAILBOX_CAPACITY);
    let (timer_tx, timers) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshots) = watch::channel(Snapshot::default());
    let (stock, _) = broadcast::channel(STOCK_CHANNEL_CAPACITY);

    let observer = WatchObserver::new(snapshot_tx, stock.clone());
    let machine = VendingMachine::from_parts(
        catalog,
        &config,
        TokioScheduler::new(timer_tx),
        observer,
    );

    info!(
        items = machine.catalog().len(),
        dispense_delay_ms = config.dispense_delay_ms,
        "vending actor starting"
    );
    tokio::spawn(run(machine, inbox, timers));

    MachineHandle {
        mailbox,
        snapshots,
        stock,
    }
}

async fn run(
    mut machine: Machine,
    mut inbox: mpsc::Receiver<Message>,
    mut timers: mpsc::UnboundedReceiver<TimerEvent>,
) {
    loop {
        tokio::select! {
            message = inbox.recv() => match message {
                Some(message) => handle_message(&mut machine, message),
                None => break,
            },
            Some(event) = timers.recv() => {
                machine.handle_timer(event);
            }
        }
    }
    debug!("vending actor stopped");
}

fn handle_message(machine: &mut Machine, message: Message) {
    match message {
        Message::Command { command, response } => {
            let outcome = machine.handle(command);
            if response.send(outcome).is_err() {
                debug!(?outcome, "caller gone before command reply");
            }
        }
        Message::Snapshot { response } => {
            if response.send(machine.snapshot()).is_err() {
                debug!("caller gone before snapshot reply");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;

    fn machine() -> Machine {
        let catalog = Catalog::new(vec![CatalogItem::new("A1", "Cola", 150, 3)]).unwrap();
        let (timers, _) = mpsc::unbounded_channel();
        let (snapshots, _) = watch::channel(Snapshot::default());
        let (stock, _) = broadcast::channel(STOCK_CHANNEL_CAPACITY);
        VendingMachine::from_parts(
            catalog,
            &MachineConfig::default(),
            TokioScheduler::new(timers),
            WatchObserver::new(snapshots, stock),
        )
    }

    #[tokio::test]
    async fn command_applies_when_caller_has_gone() {
        let mut machine = machine();
        let (response, rx) = oneshot::channel();
        drop(rx);

        handle_message(
            &mut machine,
            Message::Command {
                command: Command::InsertCoin { amount_cents: 100 },
                response,
            },
        );

        assert_eq!(machine.credit_cents(), 100);
    }

    #[tokio::test]
    async fn snapshot_request_survives_dropped_caller() {
        let mut machine = machine();
        let (response, rx) = oneshot::channel();
        drop(rx);

        handle_message(&mut machine, Message::Snapshot { response });

        let (response, rx) = oneshot::channel();
        handle_message(&mut machine, Message::Snapshot { response });
        assert_eq!(rx.await.unwrap(), machine.snapshot());
    }
}
