//! Outbound notifications to the rendering layer.

use crate::catalog::ItemId;
use crate::snapshot::Snapshot;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Receives state changes from the controller.
///
/// Both methods default to doing nothing, so an adapter only implements
/// what it renders.
pub trait MachineObserver {
    /// Called after every state mutation, including dispense start and
    /// dispense completion.
    fn on_snapshot_changed(&mut self, _snapshot: &Snapshot) {}

    /// Called when a dispense starts and reserves one unit of stock.
    fn on_stock_changed(&mut self, _item_id: &ItemId, _stock: u32) {}
}

/// Observer that discards every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl MachineObserver for NoopObserver {}

#[derive(Debug, Default)]
struct Recorded {
    snapshots: Vec<Snapshot>,
    stock_changes: Vec<(ItemId, u32)>,
}

/// Observer that keeps every notification in a shared buffer.
///
/// Clones share the same buffer, so one clone can be given to the machine
/// while another is inspected.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.recorded().snapshots.clone()
    }

    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.recorded().snapshots.last().cloned()
    }

    pub fn stock_changes(&self) -> Vec<(ItemId, u32)> {
        self.recorded().stock_changes.clone()
    }

    pub fn clear(&self) {
        let mut recorded = self.recorded();
        recorded.snapshots.clear();
        recorded.stock_changes.clear();
    }
}

impl MachineObserver for RecordingObserver {
    fn on_snapshot_changed(&mut self, snapshot: &Snapshot) {
        self.recorded().snapshots.push(snapshot.clone());
    }

    fn on_stock_changed(&mut self, item_id: &ItemId, stock: u32) {
        self.recorded().stock_changes.push((item_id.clone(), stock));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_buffer() {
        let observer = RecordingObserver::new();
        let mut handed_out = observer.clone();

        handed_out.on_snapshot_changed(&Snapshot::default());
        handed_out.on_stock_changed(&ItemId::from("A1"), 2);

        assert_eq!(observer.snapshots().len(), 1);
        assert_eq!(observer.stock_changes(), vec![(ItemId::from("A1"), 2)]);
    }

    #[test]
    fn clear_empties_both_buffers() {
        let mut observer = RecordingObserver::new();
        observer.on_snapshot_changed(&Snapshot::default());
        observer.on_stock_changed(&ItemId::from("A1"), 0);

        observer.clear();

        assert!(observer.last_snapshot().is_none());
        assert!(observer.stock_changes().is_empty());
    }
}
