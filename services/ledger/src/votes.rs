//! Vote aggregator
//!
//! Serializes counter updates per item so no increment or decrement is
//! lost under concurrent voting. Counters have no floor: symmetric
//! up/down handling can drive them negative.

use std::sync::Arc;

use tracing::debug;

use live_feed::{Broadcaster, FeedEvent};
use types::errors::LedgerError;
use types::ids::MemeId;
use types::item::{Item, VoteDirection};

use crate::locks::ItemLocks;
use crate::ranking::RankingCache;
use crate::store::RecordStore;

pub struct VoteAggregator {
    store: Arc<dyn RecordStore>,
    locks: Arc<ItemLocks>,
    ranking: Arc<RankingCache>,
    feed: Arc<Broadcaster>,
}

impl VoteAggregator {
    pub fn new(
        store: Arc<dyn RecordStore>,
        locks: Arc<ItemLocks>,
        ranking: Arc<RankingCache>,
        feed: Arc<Broadcaster>,
    ) -> Self {
        Self {
            store,
            locks,
            ranking,
            feed,
        }
    }

    /// Apply one vote to an item's counter.
    ///
    /// Before returning: both ranking snapshots are invalidated (a vote
    /// can reorder either view) and `vote-update` is published with the
    /// full updated item, in write order per item.
    pub async fn apply_vote(
        &self,
        meme_id: &MemeId,
        direction: VoteDirection,
    ) -> Result<Item, LedgerError> {
        let _guard = self.locks.acquire(meme_id).await;

        let item = self
            .store
            .get_item(meme_id)
            .await?
            .ok_or_else(|| LedgerError::item_not_found(meme_id))?;

        let updated = self
            .store
            .set_item_votes(meme_id, item.upvotes + direction.delta())
            .await?;

        self.ranking.invalidate_all();
        debug!(meme_id = %meme_id, upvotes = updated.upvotes, "Vote applied");
        self.feed.publish(&FeedEvent::VoteUpdate {
            item: updated.clone(),
        });

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::ranking::RankingConfig;
    use live_feed::FeedConfig;
    use types::ids::UserId;
    use types::item::ItemDraft;

    async fn setup() -> (Arc<MemoryStore>, VoteAggregator, Arc<RankingCache>, Arc<Broadcaster>) {
        let store = Arc::new(MemoryStore::new());
        let feed = Arc::new(Broadcaster::new(FeedConfig::default()));
        let ranking = Arc::new(RankingCache::new(store.clone(), RankingConfig::default()));
        let votes = VoteAggregator::new(
            store.clone(),
            Arc::new(ItemLocks::new()),
            ranking.clone(),
            feed.clone(),
        );
        (store, votes, ranking, feed)
    }

    async fn seed_item(store: &MemoryStore) -> MemeId {
        store
            .put_item(
                ItemDraft {
                    title: "meme".to_string(),
                    image_url: "https://example.com/x.png".to_string(),
                    tags: vec![],
                    caption: None,
                    vibe: None,
                    owner_id: UserId::anonymous(),
                },
                1,
            )
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_up_and_down_adjust_counter() {
        let (store, votes, _, _) = setup().await;
        let meme = seed_item(&store).await;

        let after_up = votes.apply_vote(&meme, VoteDirection::Up).await.unwrap();
        assert_eq!(after_up.upvotes, 1);

        let after_down = votes.apply_vote(&meme, VoteDirection::Down).await.unwrap();
        assert_eq!(after_down.upvotes, 0);
    }

    #[tokio::test]
    async fn test_counter_may_go_negative() {
        let (store, votes, _, _) = setup().await;
        let meme = seed_item(&store).await;

        for _ in 0..3 {
            votes.apply_vote(&meme, VoteDirection::Down).await.unwrap();
        }
        let item = store.get_item(&meme).await.unwrap().unwrap();
        assert_eq!(item.upvotes, -3);
    }

    #[tokio::test]
    async fn test_unknown_item_is_not_found() {
        let (_, votes, _, _) = setup().await;
        let err = votes
            .apply_vote(&MemeId::new(), VoteDirection::Up)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_vote_invalidates_cached_rankings() {
        let (store, votes, ranking, _) = setup().await;
        let meme = seed_item(&store).await;
        votes.apply_vote(&meme, VoteDirection::Up).await.unwrap();

        // Prime both snapshots, then vote again within the TTL.
        ranking.top_items(10).await.unwrap();
        ranking.trending_items(10).await.unwrap();
        votes.apply_vote(&meme, VoteDirection::Up).await.unwrap();

        let top = ranking.top_items(10).await.unwrap();
        assert_eq!(top[0].upvotes, 2, "next read must reflect the new counter");
    }

    #[tokio::test]
    async fn test_vote_publishes_updated_item() {
        let (store, votes, _, feed) = setup().await;
        let meme = seed_item(&store).await;
        let (_, mut rx) = feed.register();

        votes.apply_vote(&meme, VoteDirection::Up).await.unwrap();

        let frame = rx.recv().await.unwrap();
        assert!(frame.contains("\"topic\":\"vote-update\""));
        assert!(frame.contains("\"upvotes\":1"));
    }
}
