//! Concurrency test
//!
//! Verifies that per-item serialization holds under concurrent callers:
//! no lost vote updates, no duplicate bid rows, and ranking snapshots
//! that only change when votes (never bids) invalidate them.

use std::sync::Arc;
use std::time::Duration;

use ledger::{
    BidLedger, ItemLocks, MemoryStore, RankingCache, RankingConfig, RecordStore, VoteAggregator,
};
use live_feed::{Broadcaster, FeedConfig};
use types::ids::{MemeId, UserId};
use types::item::{ItemDraft, VoteDirection};

struct Harness {
    store: Arc<MemoryStore>,
    bids: Arc<BidLedger>,
    votes: Arc<VoteAggregator>,
    ranking: Arc<RankingCache>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let locks = Arc::new(ItemLocks::new());
    let feed = Arc::new(Broadcaster::new(FeedConfig::default()));
    let ranking = Arc::new(RankingCache::new(store.clone(), RankingConfig::default()));
    let bids = Arc::new(BidLedger::new(store.clone(), locks.clone(), feed.clone()));
    let votes = Arc::new(VoteAggregator::new(
        store.clone(),
        locks,
        ranking.clone(),
        feed,
    ));
    Harness {
        store,
        bids,
        votes,
        ranking,
    }
}

async fn seed_item(store: &MemoryStore, title: &str) -> MemeId {
    store
        .put_item(
            ItemDraft {
                title: title.to_string(),
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

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_bidders_one_row_each() {
    let h = harness();
    let meme = seed_item(&h.store, "auction").await;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let bids = h.bids.clone();
            tokio::spawn(async move {
                let bidder = UserId::new(format!("bidder-{}", i));
                bids.submit_bid(&meme, &bidder, 100 + i, 1000 + i)
                    .await
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let rows = h.bids.bids_for(&meme).await.unwrap();
    assert_eq!(rows.len(), 16, "exactly one row per distinct bidder");

    let highest = h.bids.highest_bid(&meme).await.unwrap().unwrap();
    assert_eq!(highest.credits.get(), 115);
    assert_eq!(highest.user_id.as_str(), "bidder-15");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_bidder_never_duplicates() {
    let h = harness();
    let meme = seed_item(&h.store, "auction").await;

    let handles: Vec<_> = (0..12)
        .map(|i| {
            let bids = h.bids.clone();
            tokio::spawn(async move {
                let bidder = UserId::new("repeat-bidder");
                bids.submit_bid(&meme, &bidder, 10 + i, 2000 + i)
                    .await
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let rows = h.bids.bids_for(&meme).await.unwrap();
    assert_eq!(rows.len(), 1, "repeat bids must replace, never duplicate");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_lose_nothing() {
    let h = harness();
    let meme = seed_item(&h.store, "voted").await;

    let ups: i64 = 20;
    let downs: i64 = 8;
    let mut handles = Vec::new();
    for _ in 0..ups {
        let votes = h.votes.clone();
        handles.push(tokio::spawn(async move {
            votes.apply_vote(&meme, VoteDirection::Up).await.unwrap()
        }));
    }
    for _ in 0..downs {
        let votes = h.votes.clone();
        handles.push(tokio::spawn(async move {
            votes.apply_vote(&meme, VoteDirection::Down).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let item = h.store.get_item(&meme).await.unwrap().unwrap();
    assert_eq!(item.upvotes, ups - downs);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_two_ups_one_down_lands_on_one() {
    let h = harness();
    let meme = seed_item(&h.store, "item-a").await;

    let mut handles = Vec::new();
    for direction in [VoteDirection::Up, VoteDirection::Up, VoteDirection::Down] {
        let votes = h.votes.clone();
        handles.push(tokio::spawn(async move {
            votes.apply_vote(&meme, direction).await.unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let item = h.store.get_item(&meme).await.unwrap().unwrap();
    assert_eq!(item.upvotes, 1);

    let top = h.ranking.top_items(1).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, meme);
}

#[tokio::test]
async fn test_lower_repeat_bid_wins_by_replacement() {
    let h = harness();
    let meme = seed_item(&h.store, "item-b").await;
    let bidder = UserId::new("x");

    h.bids.submit_bid(&meme, &bidder, 100, 10).await.unwrap();
    h.bids.submit_bid(&meme, &bidder, 50, 20).await.unwrap();

    let highest = h.bids.highest_bid(&meme).await.unwrap().unwrap();
    assert_eq!(highest.credits.get(), 50);
    assert_eq!(h.bids.bids_for(&meme).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_equal_bids_resolve_to_earliest() {
    let h = harness();
    let meme = seed_item(&h.store, "item-c").await;

    h.bids
        .submit_bid(&meme, &UserId::new("x"), 100, 10)
        .await
        .unwrap();
    h.bids
        .submit_bid(&meme, &UserId::new("y"), 100, 20)
        .await
        .unwrap();

    let highest = h.bids.highest_bid(&meme).await.unwrap().unwrap();
    assert_eq!(highest.user_id.as_str(), "x");
}

#[tokio::test]
async fn test_bids_never_touch_ranking_snapshots() {
    let h = harness();
    let meme = seed_item(&h.store, "ranked").await;
    h.votes.apply_vote(&meme, VoteDirection::Up).await.unwrap();

    // Prime the snapshot, then change the store behind the cache's
    // back so a rebuild would be observable.
    let before = h.ranking.top_items(10).await.unwrap();
    h.store.set_item_votes(&meme, 99).await.unwrap();

    h.bids
        .submit_bid(&meme, &UserId::new("x"), 500, 30)
        .await
        .unwrap();

    let after = h.ranking.top_items(10).await.unwrap();
    assert_eq!(before, after, "bid submission must not invalidate rankings");
}

#[tokio::test]
async fn test_vote_refreshes_rankings_within_ttl() {
    let h = harness();
    let meme = seed_item(&h.store, "fresh").await;
    h.votes.apply_vote(&meme, VoteDirection::Up).await.unwrap();

    h.ranking.top_items(10).await.unwrap();
    h.votes.apply_vote(&meme, VoteDirection::Up).await.unwrap();

    let top = h.ranking.top_items(10).await.unwrap();
    assert_eq!(
        top[0].upvotes, 2,
        "staleness must never exceed one invalidation cycle"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_independent_items_progress_in_parallel() {
    let h = harness();
    let memes = [
        seed_item(&h.store, "m0").await,
        seed_item(&h.store, "m1").await,
        seed_item(&h.store, "m2").await,
        seed_item(&h.store, "m3").await,
    ];

    let handles: Vec<_> = memes
        .iter()
        .copied()
        .map(|meme| {
            let votes = h.votes.clone();
            let bids = h.bids.clone();
            tokio::spawn(async move {
                for i in 0..50 {
                    votes.apply_vote(&meme, VoteDirection::Up).await.unwrap();
                    bids.submit_bid(&meme, &UserId::new(format!("u{}", i)), 1 + i, i)
                        .await
                        .unwrap();
                }
            })
        })
        .collect();

    tokio::time::timeout(Duration::from_secs(30), async {
        for handle in handles {
            handle.await.unwrap();
        }
    })
    .await
    .expect("independent items must not serialize against each other");

    for meme in memes {
        let item = h.store.get_item(&meme).await.unwrap().unwrap();
        assert_eq!(item.upvotes, 50);
        assert_eq!(h.bids.bids_for(&meme).await.unwrap().len(), 50);
    }
}
