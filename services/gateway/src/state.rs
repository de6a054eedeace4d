use std::sync::Arc;
use std::time::Duration;

use ledger::{
    BidLedger, ItemLocks, MemoryStore, RankingCache, RankingConfig, RecordStore, VoteAggregator,
};
use live_feed::{Broadcaster, FeedConfig};

use crate::caption::{CaptionEngine, GeminiCaptioner};
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub bids: Arc<BidLedger>,
    pub votes: Arc<VoteAggregator>,
    pub ranking: Arc<RankingCache>,
    pub feed: Arc<Broadcaster>,
    pub captions: Arc<dyn CaptionEngine>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
        let locks = Arc::new(ItemLocks::new());
        let feed = Arc::new(Broadcaster::new(FeedConfig {
            queue_capacity: config.feed_queue_capacity,
        }));
        let ranking = Arc::new(RankingCache::new(
            store.clone(),
            RankingConfig {
                ttl: Duration::from_secs(config.ranking_ttl_secs),
                cap: config.ranking_cap,
            },
        ));
        let bids = Arc::new(BidLedger::new(store.clone(), locks.clone(), feed.clone()));
        let votes = Arc::new(VoteAggregator::new(
            store.clone(),
            locks,
            ranking.clone(),
            feed.clone(),
        ));
        let captions: Arc<dyn CaptionEngine> = Arc::new(GeminiCaptioner::new(
            config.caption_api_key.clone(),
            config.caption_model.clone(),
            Duration::from_secs(config.caption_timeout_secs),
        ));

        Self {
            store,
            bids,
            votes,
            ranking,
            feed,
            captions,
        }
    }
}
