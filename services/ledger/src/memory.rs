//! In-process implementation of the record store
//!
//! Backs the binary and the test suites. Rows live in concurrent maps;
//! a monotonic insertion sequence per item provides the stable "natural
//! order" that vote-ranking ties resolve by.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use types::bid::Bid;
use types::errors::StoreError;
use types::ids::{BidId, MemeId, UserId};
use types::item::{Item, ItemDraft};
use types::numeric::Credits;

use crate::store::RecordStore;

/// An item row plus its insertion sequence (not serialized).
#[derive(Debug, Clone)]
struct StoredItem {
    item: Item,
    seq: u64,
}

/// DashMap-backed store with single-operation atomicity.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: DashMap<MemeId, StoredItem>,
    bids: DashMap<BidId, Bid>,
    insert_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn items_snapshot(&self) -> Vec<StoredItem> {
        self.items.iter().map(|entry| entry.value().clone()).collect()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put_item(&self, draft: ItemDraft, timestamp: i64) -> Result<Item, StoreError> {
        let item = Item {
            id: MemeId::new(),
            title: draft.title,
            image_url: draft.image_url,
            tags: draft.tags,
            caption: draft.caption,
            vibe: draft.vibe,
            upvotes: 0,
            owner_id: draft.owner_id,
            created_at: timestamp,
        };
        let seq = self.insert_seq.fetch_add(1, Ordering::Relaxed);
        self.items.insert(item.id, StoredItem { item: item.clone(), seq });
        Ok(item)
    }

    async fn get_item(&self, id: &MemeId) -> Result<Option<Item>, StoreError> {
        Ok(self.items.get(id).map(|entry| entry.item.clone()))
    }

    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let mut rows = self.items_snapshot();
        rows.sort_by(|a, b| {
            b.item
                .created_at
                .cmp(&a.item.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|row| row.item).collect())
    }

    async fn set_item_votes(&self, id: &MemeId, upvotes: i64) -> Result<Item, StoreError> {
        let mut entry = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingRow(id.to_string()))?;
        entry.item.upvotes = upvotes;
        Ok(entry.item.clone())
    }

    async fn set_item_caption(
        &self,
        id: &MemeId,
        caption: String,
        vibe: String,
    ) -> Result<Item, StoreError> {
        let mut entry = self
            .items
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingRow(id.to_string()))?;
        entry.item.caption = Some(caption);
        entry.item.vibe = Some(vibe);
        Ok(entry.item.clone())
    }

    async fn items_by_votes(&self, limit: usize) -> Result<Vec<Item>, StoreError> {
        let mut rows = self.items_snapshot();
        rows.sort_by(|a, b| {
            b.item
                .upvotes
                .cmp(&a.item.upvotes)
                .then(a.seq.cmp(&b.seq))
        });
        rows.truncate(limit);
        Ok(rows.into_iter().map(|row| row.item).collect())
    }

    async fn recent_items_with_votes(&self, limit: usize) -> Result<Vec<Item>, StoreError> {
        let mut rows: Vec<StoredItem> = self
            .items_snapshot()
            .into_iter()
            .filter(|row| row.item.upvotes > 0)
            .collect();
        rows.sort_by(|a, b| {
            b.item
                .created_at
                .cmp(&a.item.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        rows.truncate(limit);
        Ok(rows.into_iter().map(|row| row.item).collect())
    }

    async fn insert_bid(
        &self,
        meme_id: &MemeId,
        user_id: &UserId,
        credits: Credits,
        timestamp: i64,
    ) -> Result<Bid, StoreError> {
        let bid = Bid {
            id: BidId::new(),
            meme_id: *meme_id,
            user_id: user_id.clone(),
            credits,
            created_at: timestamp,
        };
        self.bids.insert(bid.id, bid.clone());
        Ok(bid)
    }

    async fn find_bid(
        &self,
        meme_id: &MemeId,
        user_id: &UserId,
    ) -> Result<Option<Bid>, StoreError> {
        Ok(self
            .bids
            .iter()
            .find(|entry| entry.meme_id == *meme_id && entry.user_id == *user_id)
            .map(|entry| entry.value().clone()))
    }

    async fn set_bid_credits(
        &self,
        bid_id: &BidId,
        credits: Credits,
        timestamp: i64,
    ) -> Result<Bid, StoreError> {
        let mut entry = self
            .bids
            .get_mut(bid_id)
            .ok_or_else(|| StoreError::MissingRow(bid_id.to_string()))?;
        entry.credits = credits;
        entry.created_at = timestamp;
        Ok(entry.clone())
    }

    async fn bids_by_item(&self, meme_id: &MemeId) -> Result<Vec<Bid>, StoreError> {
        let mut rows: Vec<Bid> = self
            .bids
            .iter()
            .filter(|entry| entry.meme_id == *meme_id)
            .map(|entry| entry.value().clone())
            .collect();
        rows.sort_by(|a, b| {
            b.credits
                .cmp(&a.credits)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(rows)
    }
}
