//! Marketplace Ledger Core
//!
//! Concurrent state-mutation core for the meme marketplace:
//! - Bid ledger: one live row per (item, bidder), replace-on-repeat
//! - Vote aggregator: lost-update-free counter changes
//! - Ranking cache: TTL-bounded `top`/`trending` snapshots with explicit
//!   invalidation on votes and item creation
//! - Per-item lock table serializing all read-modify-write sequences
//!
//! # Architecture
//!
//! ```text
//!  client action
//!       │
//!  ┌────▼─────────┐   per-item lock   ┌─────────────┐
//!  │ BidLedger /  │◄──────────────────┤  ItemLocks  │
//!  │VoteAggregator│                   └─────────────┘
//!  └────┬─────────┘
//!       │ writes                invalidate   publish
//!  ┌────▼────────┐            ┌───────────┐ ┌───────────┐
//!  │ RecordStore │            │RankingCache│ │Broadcaster│
//!  └─────────────┘            └───────────┘ └───────────┘
//! ```
//!
//! Reads consult the ranking cache, which reconstructs from the store
//! on miss or expiry.

pub mod bids;
pub mod locks;
pub mod memory;
pub mod ranking;
pub mod store;
pub mod votes;

pub use bids::BidLedger;
pub use locks::ItemLocks;
pub use memory::MemoryStore;
pub use ranking::{RankingCache, RankingConfig, RankingKind};
pub use store::RecordStore;
pub use votes::VoteAggregator;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as Unix nanoseconds.
///
/// Core operations take timestamps as arguments; this is the edge
/// clock used by callers.
pub fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}
