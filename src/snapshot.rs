//! Display snapshots emitted to the rendering layer.
//!
//! A snapshot is an immutable view of everything the front panel shows.
//! The adapter renders it however it likes; `Display` gives the stock
//! panel text.

use crate::catalog::{CatalogItem, ItemId};
use crate::core::DispenseState;
use crate::money::format_cents;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship between credit and the selected item's price.
///
/// `Owed` carries `price - credit` while that is positive; once credit
/// meets or exceeds the price the sign flips and `Change` carries
/// `credit - price`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Balance {
    Owed { cents: u64 },
    Change { cents: u64 },
}

impl Balance {
    pub fn between(credit_cents: u64, price_cents: u32) -> Self {
        let price = u64::from(price_cents);
        if price > credit_cents {
            Self::Owed {
                cents: price - credit_cents,
            }
        } else {
            Self::Change {
                cents: credit_cents - price,
            }
        }
    }

    /// Magnitude of the balance, whichever side it falls on.
    pub fn remaining_cents(&self) -> u64 {
        match self {
            Self::Owed { cents } | Self::Change { cents } => *cents,
        }
    }
}

/// What the panel shows about the selected item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionView {
    pub item_id: ItemId,
    pub name: String,
    pub price_cents: u32,
    pub stock: u32,
    pub balance: Balance,
    pub is_dispensing: bool,
    pub out_of_stock: bool,
}

impl SelectionView {
    pub fn remaining_cents(&self) -> u64 {
        self.balance.remaining_cents()
    }
}

impl fmt::Display for SelectionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dispensing {
            return write!(f, "Dispensing {}...", self.name);
        }
        if self.out_of_stock {
            return write!(f, "{}: out of stock", self.name);
        }
        match self.balance {
            Balance::Owed { cents } => write!(f, "{}: owed {}", self.name, format_cents(cents)),
            Balance::Change { cents } => {
                write!(f, "{}: change {}", self.name, format_cents(cents))
            }
        }
    }
}

/// Immutable view of the machine for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub credit_cents: u64,
    pub selection: Option<SelectionView>,
}

impl Snapshot {
    pub fn capture(
        credit_cents: u64,
        selected: Option<&CatalogItem>,
        state: &DispenseState,
    ) -> Self {
        let selection = selected.map(|item| SelectionView {
            item_id: item.id.clone(),
            name: item.name.clone(),
            price_cents: item.price_cents,
            stock: item.stock,
            balance: Balance::between(credit_cents, item.price_cents),
            is_dispensing: state.is_dispensing(),
            out_of_stock: !item.in_stock(),
        });

        Self {
            credit_cents,
            selection,
        }
    }

    pub fn is_dispensing(&self) -> bool {
        self.selection.as_ref().is_some_and(|s| s.is_dispensing)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Credit: {}", format_cents(self.credit_cents))?;
        match &self.selection {
            Some(selection) => write!(f, "{selection}"),
            None => f.write_str("Select an item"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn balance_is_owed_while_price_exceeds_credit() {
        assert_eq!(Balance::between(100, 150), Balance::Owed { cents: 50 });
        assert_eq!(Balance::between(0, 150).remaining_cents(), 150);
    }

    #[test]
    fn balance_flips_to_change_at_exact_price() {
        assert_eq!(Balance::between(150, 150), Balance::Change { cents: 0 });
        assert_eq!(Balance::between(200, 150), Balance::Change { cents: 50 });
    }

    #[test]
    fn empty_snapshot_prompts_for_selection() {
        let snapshot = Snapshot::capture(20, None, &DispenseState::Idle);
        assert_eq!(snapshot.to_string(), "Credit: $0.20\nSelect an item");
        assert!(!snapshot.is_dispensing());
    }

    #[test]
    fn owed_text() {
        let item = CatalogItem::new("A1", "Cola", 150, 3);
        let snapshot = Snapshot::capture(100, Some(&item), &DispenseState::Idle);
        assert_eq!(snapshot.to_string(), "Credit: $1.00\nCola: owed $0.50");
    }

    #[test]
    fn change_text() {
        let item = CatalogItem::new("A1", "Cola", 150, 3);
        let snapshot = Snapshot::capture(200, Some(&item), &DispenseState::Idle);
        assert_eq!(snapshot.to_string(), "Credit: $2.00\nCola: change $0.50");
    }

    #[test]
    fn out_of_stock_text_and_flag() {
        let item = CatalogItem::new("B2", "Chips", 100, 0);
        let snapshot = Snapshot::capture(500, Some(&item), &DispenseState::Idle);
        let selection = snapshot.selection.as_ref().unwrap();
        assert!(selection.out_of_stock);
        assert_eq!(snapshot.to_string(), "Credit: $5.00\nChips: out of stock");
    }

    #[test]
    fn dispensing_text_takes_priority() {
        let item = CatalogItem::new("A1", "Cola", 150, 0);
        let state = DispenseState::Dispensing {
            item_id: item.id.clone(),
            receipt: Uuid::new_v4(),
        };
        let snapshot = Snapshot::capture(150, Some(&item), &state);
        assert!(snapshot.is_dispensing());
        assert_eq!(snapshot.to_string(), "Credit: $1.50\nDispensing Cola...");
    }
}
