//! Channel-backed observer for the actor.

use crate::catalog::ItemId;
use crate::effects::MachineObserver;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::debug;

/// A stock level change published when a dispense starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub item_id: ItemId,
    pub stock: u32,
}

/// Publishes the latest snapshot on a `watch` channel and stock changes on
/// a `broadcast` channel. Publishing never blocks and never fails when
/// nobody is listening.
#[derive(Debug)]
pub struct WatchObserver {
    snapshots: watch::Sender<Snapshot>,
    stock: broadcast::Sender<StockChange>,
}

impl WatchObserver {
    pub fn new(snapshots: watch::Sender<Snapshot>, stock: broadcast::Sender<StockChange>) -> Self {
        Self { snapshots, stock }
    }
}

impl MachineObserver for WatchObserver {
    fn on_snapshot_changed(&mut self, snapshot: &Snapshot) {
        self.snapshots.send_replace(snapshot.clone());
    }

    fn on_stock_changed(&mut self, item_id: &ItemId, stock: u32) {
        let change = StockChange {
            item_id: item_id.clone(),
            stock,
        };
        if self.stock.send(change).is_err() {
            debug!(%item_id, stock, "no stock subscribers");
        }
    }
}
