//! Durable-store boundary
//!
//! The marketplace core owns no durable rows; it reaches items and bids
//! through this trait. Implementations only need per-operation atomicity
//! (get / put / query-by-field / update-field); multi-step sequences are
//! serialized above this boundary by the per-item lock table.

use async_trait::async_trait;
use types::bid::Bid;
use types::errors::StoreError;
use types::ids::{BidId, MemeId, UserId};
use types::item::{Item, ItemDraft};
use types::numeric::Credits;

/// Storage adapter for items and bids.
///
/// Failures are hard failures: the core surfaces them to the caller
/// without retrying.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new item. The store assigns the id and `created_at`;
    /// the vote counter starts at zero.
    async fn put_item(&self, draft: ItemDraft, timestamp: i64) -> Result<Item, StoreError>;

    /// Fetch a single item by id.
    async fn get_item(&self, id: &MemeId) -> Result<Option<Item>, StoreError>;

    /// All items, newest first.
    async fn list_items(&self) -> Result<Vec<Item>, StoreError>;

    /// Overwrite an item's vote counter (single-field update).
    async fn set_item_votes(&self, id: &MemeId, upvotes: i64) -> Result<Item, StoreError>;

    /// Overwrite an item's caption and vibe (single-field updates).
    async fn set_item_caption(
        &self,
        id: &MemeId,
        caption: String,
        vibe: String,
    ) -> Result<Item, StoreError>;

    /// Items ordered by vote counter descending; ties resolve in the
    /// store's insertion order (stable).
    async fn items_by_votes(&self, limit: usize) -> Result<Vec<Item>, StoreError>;

    /// Items with a positive counter, most recently created first.
    async fn recent_items_with_votes(&self, limit: usize) -> Result<Vec<Item>, StoreError>;

    /// Insert a fresh bid row.
    async fn insert_bid(
        &self,
        meme_id: &MemeId,
        user_id: &UserId,
        credits: Credits,
        timestamp: i64,
    ) -> Result<Bid, StoreError>;

    /// Locate the live bid row for a (item, bidder) pair, if any.
    async fn find_bid(&self, meme_id: &MemeId, user_id: &UserId)
        -> Result<Option<Bid>, StoreError>;

    /// Replace the amount on an existing bid row and refresh its timestamp.
    async fn set_bid_credits(
        &self,
        bid_id: &BidId,
        credits: Credits,
        timestamp: i64,
    ) -> Result<Bid, StoreError>;

    /// All bids for an item, highest credits first (ties earliest-first).
    async fn bids_by_item(&self, meme_id: &MemeId) -> Result<Vec<Bid>, StoreError>;
}
