//! End-to-end purchase scenarios driven with virtual time.

use std::time::Duration;
use vendsim::builder::VendingMachineBuilder;
use vendsim::catalog::{CatalogItem, ItemId};
use vendsim::core::DispenseState;
use vendsim::effects::{CommandOutcome, IgnoreReason, ManualScheduler, RecordingObserver, VendingMachine};
use vendsim::snapshot::Balance;

const DISPENSE: Duration = Duration::from_millis(3000);

type Machine = VendingMachine<ManualScheduler, RecordingObserver>;

fn machine_with(items: Vec<CatalogItem>) -> (Machine, RecordingObserver) {
    let observer = RecordingObserver::new();
    let machine = VendingMachineBuilder::new(ManualScheduler::new())
        .items(items)
        .observer(observer.clone())
        .build()
        .unwrap();
    (machine, observer)
}

fn stock_of(machine: &Machine, id: &str) -> u32 {
    machine.catalog().get(&ItemId::from(id)).unwrap().stock
}

#[test]
fn exact_change_purchase_with_selection_first() {
    let (mut machine, _) = machine_with(vec![CatalogItem::new("A1", "Cola", 150, 3)]);

    machine.select_item("A1");
    for coin in [100, 20, 20, 10] {
        machine.insert_coin(coin);
    }

    assert!(machine.state().is_dispensing());
    assert_eq!(stock_of(&machine, "A1"), 2);

    machine.advance_time(DISPENSE);

    assert_eq!(machine.credit_cents(), 0);
    assert_eq!(machine.selected_item_id(), Some(&ItemId::from("A1")));
    assert_eq!(stock_of(&machine, "A1"), 2);
}

#[test]
fn exact_change_purchase_with_selection_last() {
    let (mut machine, _) = machine_with(vec![CatalogItem::new("A1", "Cola", 150, 3)]);

    for coin in [100, 20, 20, 10] {
        machine.insert_coin(coin);
    }
    assert_eq!(machine.state(), &DispenseState::Idle);

    machine.select_item("A1");
    assert!(machine.state().is_dispensing());

    machine.advance_time(DISPENSE);

    assert_eq!(machine.credit_cents(), 0);
    assert_eq!(machine.selected_item_id(), Some(&ItemId::from("A1")));
    assert_eq!(stock_of(&machine, "A1"), 2);
}

#[test]
fn overpay_on_last_unit_leaves_change_and_clears_selection() {
    let (mut machine, observer) = machine_with(vec![CatalogItem::new("A2", "Water", 100, 1)]);

    machine.select_item("A2");
    machine.insert_coin(20);
    machine.insert_coin(100);

    assert!(machine.state().is_dispensing());
    assert_eq!(stock_of(&machine, "A2"), 0);
    assert_eq!(observer.stock_changes(), vec![(ItemId::from("A2"), 0)]);

    machine.advance_time(DISPENSE);

    assert_eq!(machine.credit_cents(), 20);
    assert!(machine.selected_item_id().is_none());

    let shown = observer.last_snapshot().unwrap();
    assert_eq!(shown.credit_cents, 20);
    assert!(shown.selection.is_none());
    assert_eq!(shown.to_string(), "Credit: $0.20\nSelect an item");
}

#[test]
fn coin_arriving_mid_dispense_is_not_credited() {
    let (mut machine, _) = machine_with(vec![CatalogItem::new("A2", "Water", 100, 1)]);

    machine.select_item("A2");
    machine.insert_coin(100);
    assert_eq!(
        machine.insert_coin(20),
        CommandOutcome::Ignored(IgnoreReason::Dispensing)
    );

    machine.advance_time(DISPENSE);

    assert_eq!(machine.credit_cents(), 0);
    assert!(machine.selected_item_id().is_none());
}

#[test]
fn underpay_then_top_up() {
    let (mut machine, observer) = machine_with(vec![CatalogItem::new("A1", "Cola", 150, 3)]);

    machine.select_item("A1");
    machine.insert_coin(100);

    let shown = observer.last_snapshot().unwrap();
    let selection = shown.selection.as_ref().unwrap();
    assert_eq!(selection.balance, Balance::Owed { cents: 50 });
    assert_eq!(selection.remaining_cents(), 50);
    assert_eq!(shown.to_string(), "Credit: $1.00\nCola: owed $0.50");

    machine.insert_coin(100);
    assert!(machine.state().is_dispensing());

    machine.advance_time(DISPENSE);

    assert_eq!(machine.credit_cents(), 50);
    let selection = machine.snapshot().selection.unwrap();
    assert_eq!(selection.balance, Balance::Owed { cents: 100 });
}

#[test]
fn cancel_clears_state_without_touching_stock() {
    let (mut machine, _) = machine_with(vec![
        CatalogItem::new("A1", "Cola", 150, 3),
        CatalogItem::new("A2", "Water", 100, 4),
    ]);

    machine.insert_coin(10);
    machine.insert_coin(20);
    machine.select_item("A2");
    machine.cancel();

    assert_eq!(machine.credit_cents(), 0);
    assert!(machine.selected_item_id().is_none());
    assert_eq!(stock_of(&machine, "A1"), 3);
    assert_eq!(stock_of(&machine, "A2"), 4);
    assert!(machine.history().is_empty());
}

#[test]
fn out_of_stock_selection_never_dispenses() {
    let (mut machine, observer) = machine_with(vec![CatalogItem::new("B1", "Chips", 120, 0)]);

    machine.select_item("B1");
    for _ in 0..20 {
        machine.insert_coin(100);
    }
    machine.advance_time(DISPENSE * 10);

    assert_eq!(machine.state(), &DispenseState::Idle);
    assert_eq!(machine.credit_cents(), 2000);
    assert!(observer.stock_changes().is_empty());

    let shown = observer.last_snapshot().unwrap();
    assert!(shown.selection.as_ref().unwrap().out_of_stock);
    assert_eq!(shown.to_string(), "Credit: $20.00\nChips: out of stock");
}

#[test]
fn reselecting_after_sell_out_buys_another_item() {
    let (mut machine, _) = machine_with(vec![
        CatalogItem::new("A2", "Water", 100, 1),
        CatalogItem::new("C1", "Gum", 50, 5),
    ]);

    machine.insert_coin(100);
    machine.insert_coin(100);
    machine.select_item("A2");
    machine.advance_time(DISPENSE);
    assert_eq!(machine.credit_cents(), 100);
    assert!(machine.selected_item_id().is_none());

    machine.select_item("C1");
    machine.advance_time(DISPENSE);

    assert_eq!(machine.credit_cents(), 50);
    assert_eq!(stock_of(&machine, "C1"), 4);
    assert_eq!(machine.history().len(), 4);
}
