//! Error taxonomy for the marketplace core
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Top-level ledger error
///
/// Store failures propagate hard to the caller; enrichment failures are
/// recovered locally by the gateway and never surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Malformed or missing input; the operation was not attempted
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced item or bid does not exist
    #[error("Not found: {entity} {id}")]
    NotFound { entity: &'static str, id: String },

    /// The durable store is unreachable or returned a failure
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Shorthand for an unknown-item failure
    pub fn item_not_found(id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity: "item",
            id: id.to_string(),
        }
    }
}

/// Durable-store failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The row disappeared between a read and a field update
    #[error("Row vanished during update: {0}")]
    MissingRow(String),
}
