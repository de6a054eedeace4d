//! Per-item mutual exclusion
//!
//! Read-modify-write sequences (counter updates, replace-or-insert bids)
//! must be atomic with respect to other operations on the same item,
//! while operations on different items proceed independently. Locks are
//! created on first use and never removed; an item's lock is shared by
//! the bid ledger and the vote aggregator.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use types::ids::MemeId;

/// Mapping from item identifier to its serialization lock.
#[derive(Debug, Default)]
pub struct ItemLocks {
    locks: DashMap<MemeId, Arc<Mutex<()>>>,
}

impl ItemLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one item, creating it on first use.
    ///
    /// The guard is owned so the critical section can span awaits into
    /// the store.
    pub async fn acquire(&self, id: &MemeId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(*id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Number of items that have ever been locked.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
