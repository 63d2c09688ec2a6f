//! Dispense eligibility.
//!
//! Pure predicate deciding whether the current credit and selection are
//! enough to start a dispense. It reads state and never mutates it, so it
//! can be evaluated any number of times.

use crate::catalog::CatalogItem;
use serde::{Deserialize, Serialize};

/// Outcome of the dispense eligibility check.
///
/// # Example
///
/// ```rust
/// use vendsim::catalog::CatalogItem;
/// use vendsim::core::Eligibility;
///
/// let cola = CatalogItem::new("A1", "Cola", 150, 3);
///
/// assert_eq!(Eligibility::evaluate(0, None), Eligibility::NoSelection);
/// assert_eq!(
///     Eligibility::evaluate(100, Some(&cola)),
///     Eligibility::InsufficientCredit { short_by: 50 }
/// );
/// assert!(Eligibility::evaluate(150, Some(&cola)).is_ready());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    NoSelection,
    OutOfStock,
    InsufficientCredit { short_by: u64 },
    Ready,
}

impl Eligibility {
    /// Evaluate the preconditions: a selection exists, it has stock, and
    /// credit covers its price. Stock is checked before credit.
    pub fn evaluate(credit_cents: u64, selected: Option<&CatalogItem>) -> Self {
        let Some(item) = selected else {
            return Self::NoSelection;
        };

        if item.stock == 0 {
            return Self::OutOfStock;
        }

        let price = u64::from(item.price_cents);
        if credit_cents < price {
            return Self::InsufficientCredit {
                short_by: price - credit_cents,
            };
        }

        Self::Ready
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}
