//! Product catalog.
//!
//! The catalog is loaded once when the machine is built and is never
//! resized afterwards. Prices are fixed; stock only changes through the
//! controller's dispense sequence.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use stillwater::validation::Validation;

pub mod error;
pub mod validation;

pub use error::CatalogError;
pub use validation::CatalogViolation;

/// Stable identifier of a product slot, e.g. `"A1"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One sellable product slot.
///
/// Prices and stock are unsigned, so a record with a negative price or
/// stock cannot be constructed or deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub price_cents: u32,
    pub stock: u32,
}

impl CatalogItem {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, price_cents: u32, stock: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_cents,
            stock,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// The fixed set of product slots, in load order.
///
/// # Example
///
/// ```rust
/// use vendsim::catalog::Catalog;
///
/// let catalog = Catalog::from_json(
///     r#"[{"id": "A1", "name": "Cola", "priceCents": 150, "stock": 3}]"#,
/// )
/// .unwrap();
///
/// let cola = catalog.get(&"A1".into()).unwrap();
/// assert_eq!(cola.price_cents, 150);
/// ```
#[derive(Clone, Debug, Default, Serialize)]
pub struct Catalog {
    items: Vec<CatalogItem>,
    #[serde(skip)]
    index: HashMap<ItemId, usize>,
}

impl Catalog {
    /// Build a catalog from records, rejecting the whole feed if any record
    /// breaks catalog rules.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        if let Validation::Failure(errors) = validation::validate(&items) {
            return Err(CatalogError::Invalid {
                violations: errors.iter().cloned().collect(),
            });
        }

        let index = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.id.clone(), position))
            .collect();

        Ok(Self { items, index })
    }

    /// Parse a JSON array of `{ id, name, priceCents, stock }` records.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)?;
        Self::new(items)
    }

    pub fn get(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reserve one unit of stock. Returns the new stock level, or `None` if
    /// the item is unknown or already empty.
    pub(crate) fn take_one(&mut self, id: &ItemId) -> Option<u32> {
        let position = *self.index.get(id)?;
        let item = &mut self.items[position];
        item.stock = item.stock.checked_sub(1)?;
        Some(item.stock)
    }
}
