//! Catalog loading errors.

use super::validation::CatalogViolation;
use thiserror::Error;

/// Errors that can occur while loading catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The feed was not a JSON array of catalog records
    #[error("Catalog parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    /// The records parsed but break catalog rules
    #[error("Catalog has {} invalid record(s)", .violations.len())]
    Invalid { violations: Vec<CatalogViolation> },
}
