//! Catalog validation using `Validation`.
//!
//! Every record is checked and every problem is reported, so a bad feed can
//! be fixed in one pass instead of one error at a time.

use crate::catalog::{CatalogItem, ItemId};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single problem found in catalog data. `index` is the record's position
/// in the loaded sequence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogViolation {
    #[error("Record {index} has an empty id")]
    EmptyId { index: usize },

    #[error("Record {index} ('{id}') has an empty name")]
    EmptyName { index: usize, id: ItemId },

    #[error("Record {index} reuses id '{id}'")]
    DuplicateId { index: usize, id: ItemId },
}

type Check = Validation<(), NonEmptyVec<CatalogViolation>>;

/// Check all records, accumulating ALL violations.
pub fn validate(items: &[CatalogItem]) -> Check {
    let mut checks: Vec<Check> = Vec::with_capacity(items.len() * 3);
    let mut seen: HashSet<&ItemId> = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        checks.push(if item.id.as_str().trim().is_empty() {
            Validation::fail(CatalogViolation::EmptyId { index })
        } else {
            Validation::success(())
        });

        checks.push(if item.name.trim().is_empty() {
            Validation::fail(CatalogViolation::EmptyName {
                index,
                id: item.id.clone(),
            })
        } else {
            Validation::success(())
        });

        checks.push(if seen.insert(&item.id) {
            Validation::success(())
        } else {
            Validation::fail(CatalogViolation::DuplicateId {
                index,
                id: item.id.clone(),
            })
        });
    }

    Validation::all_vec(checks).map(|_| ())
}
