//! Bid ledger
//!
//! Owns the at-most-one-live-row-per-(item, bidder) invariant and
//! serializes concurrent submissions per item. The highest-bid view is
//! derived on demand, never stored.

use std::sync::Arc;

use tracing::debug;

use live_feed::{Broadcaster, FeedEvent};
use types::bid::Bid;
use types::errors::LedgerError;
use types::ids::{MemeId, UserId};
use types::numeric::Credits;

use crate::locks::ItemLocks;
use crate::store::RecordStore;

pub struct BidLedger {
    store: Arc<dyn RecordStore>,
    locks: Arc<ItemLocks>,
    feed: Arc<Broadcaster>,
}

impl BidLedger {
    pub fn new(store: Arc<dyn RecordStore>, locks: Arc<ItemLocks>, feed: Arc<Broadcaster>) -> Self {
        Self { store, locks, feed }
    }

    /// Place or replace a bid.
    ///
    /// A repeat bid from the same bidder overwrites the amount on the
    /// existing row and refreshes its timestamp. The `new-bid` event is
    /// published after the durable write, still inside the item's
    /// critical section, so per-item event order matches write order.
    pub async fn submit_bid(
        &self,
        meme_id: &MemeId,
        user_id: &UserId,
        credits: i64,
        timestamp: i64,
    ) -> Result<Bid, LedgerError> {
        let credits = Credits::try_new(credits).ok_or_else(|| {
            LedgerError::InvalidArgument(format!(
                "credits must be a positive integer, got {}",
                credits
            ))
        })?;

        let _guard = self.locks.acquire(meme_id).await;

        if self.store.get_item(meme_id).await?.is_none() {
            return Err(LedgerError::item_not_found(meme_id));
        }

        let bid = match self.store.find_bid(meme_id, user_id).await? {
            Some(existing) => {
                self.store
                    .set_bid_credits(&existing.id, credits, timestamp)
                    .await?
            }
            None => {
                self.store
                    .insert_bid(meme_id, user_id, credits, timestamp)
                    .await?
            }
        };

        debug!(meme_id = %meme_id, user_id = %user_id, credits = %credits, "Bid recorded");
        self.feed.publish(&FeedEvent::NewBid { bid: bid.clone() });

        Ok(bid)
    }

    /// The max-amount bid for an item, ties broken by earliest
    /// timestamp; `None` if the item has no bids.
    pub async fn highest_bid(&self, meme_id: &MemeId) -> Result<Option<Bid>, LedgerError> {
        let bids = self.store.bids_by_item(meme_id).await?;
        Ok(bids
            .into_iter()
            .reduce(|best, bid| if bid.beats(&best) { bid } else { best }))
    }

    /// All bids for an item, highest credits first.
    pub async fn bids_for(&self, meme_id: &MemeId) -> Result<Vec<Bid>, LedgerError> {
        Ok(self.store.bids_by_item(meme_id).await?)
    }
}
