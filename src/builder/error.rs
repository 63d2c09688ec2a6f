//! Build errors for the machine builder.

use crate::catalog::CatalogError;
use thiserror::Error;

/// Errors that can occur when building a vending machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Catalog not specified. Call .catalog(catalog) or .items(items) before .build()")]
    MissingCatalog,

    #[error("Catalog rejected: {0}")]
    Catalog(#[from] CatalogError),
}
