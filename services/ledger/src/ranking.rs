//! Time-bounded ranked views over items
//!
//! Each ranking kind keeps a single cached snapshot, rebuilt from the
//! store at a fixed wide cap and sliced per request. Snapshots expire
//! by TTL and are discarded synchronously when votes or item creation
//! change the underlying state; bid writes never touch them.
//!
//! "Trending" is a recency filter over positive-vote items, not a
//! velocity metric.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

use types::errors::LedgerError;
use types::item::Item;

use crate::store::RecordStore;

/// Which ranked view a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingKind {
    /// Vote counter descending, stable on ties
    Top,
    /// Positive-vote items, most recently created first
    Trending,
}

impl RankingKind {
    fn label(&self) -> &'static str {
        match self {
            RankingKind::Top => "top",
            RankingKind::Trending => "trending",
        }
    }
}

/// Configuration for the ranking cache.
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// How long a snapshot stays valid without explicit invalidation.
    pub ttl: Duration,
    /// Snapshot width; requests up to this limit are served by slicing.
    pub cap: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            cap: 100,
        }
    }
}

/// One cached ranked view.
struct CachedView {
    items: Vec<Item>,
    computed_at: Instant,
}

impl CachedView {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.computed_at.elapsed() < ttl
    }
}

/// Derives and caches the `top` and `trending` views.
///
/// Readers never observe a partially-built snapshot: rebuilds query the
/// store first and swap the finished view in under a short write lock.
pub struct RankingCache {
    store: Arc<dyn RecordStore>,
    config: RankingConfig,
    top: RwLock<Option<CachedView>>,
    trending: RwLock<Option<CachedView>>,
}

impl RankingCache {
    pub fn new(store: Arc<dyn RecordStore>, config: RankingConfig) -> Self {
        Self {
            store,
            config,
            top: RwLock::new(None),
            trending: RwLock::new(None),
        }
    }

    /// Items sorted by vote counter descending.
    pub async fn top_items(&self, limit: usize) -> Result<Vec<Item>, LedgerError> {
        self.ranked(RankingKind::Top, limit).await
    }

    /// Positive-vote items, most recent first.
    pub async fn trending_items(&self, limit: usize) -> Result<Vec<Item>, LedgerError> {
        self.ranked(RankingKind::Trending, limit).await
    }

    /// Synchronously discard one kind's snapshot; the next read
    /// recomputes from the store.
    pub fn invalidate(&self, kind: RankingKind) {
        *write_lock(self.slot(kind)) = None;
        debug!(kind = kind.label(), "Ranking snapshot invalidated");
    }

    /// Discard both snapshots (votes and item creation can reorder
    /// either view).
    pub fn invalidate_all(&self) {
        self.invalidate(RankingKind::Top);
        self.invalidate(RankingKind::Trending);
    }

    async fn ranked(&self, kind: RankingKind, limit: usize) -> Result<Vec<Item>, LedgerError> {
        // Requests wider than the snapshot cap go straight to the store
        // and leave the cache untouched.
        if limit > self.config.cap {
            return self.query(kind, limit).await;
        }

        if let Some(items) = self.cached_slice(kind, limit) {
            return Ok(items);
        }

        let items = self.query(kind, self.config.cap).await?;
        let slice: Vec<Item> = items.iter().take(limit).cloned().collect();
        *write_lock(self.slot(kind)) = Some(CachedView {
            items,
            computed_at: Instant::now(),
        });
        debug!(kind = kind.label(), "Ranking snapshot rebuilt");
        Ok(slice)
    }

    fn cached_slice(&self, kind: RankingKind, limit: usize) -> Option<Vec<Item>> {
        let slot = read_lock(self.slot(kind));
        slot.as_ref()
            .filter(|view| view.is_fresh(self.config.ttl))
            .map(|view| view.items.iter().take(limit).cloned().collect())
    }

    async fn query(&self, kind: RankingKind, limit: usize) -> Result<Vec<Item>, LedgerError> {
        let items = match kind {
            RankingKind::Top => self.store.items_by_votes(limit).await?,
            RankingKind::Trending => self.store.recent_items_with_votes(limit).await?,
        };
        Ok(items)
    }

    fn slot(&self, kind: RankingKind) -> &RwLock<Option<CachedView>> {
        match kind {
            RankingKind::Top => &self.top,
            RankingKind::Trending => &self.trending,
        }
    }
}

fn read_lock(slot: &RwLock<Option<CachedView>>) -> std::sync::RwLockReadGuard<'_, Option<CachedView>> {
    slot.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock(slot: &RwLock<Option<CachedView>>) -> std::sync::RwLockWriteGuard<'_, Option<CachedView>> {
    slot.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}
