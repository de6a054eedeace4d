//! Push-notification topics for connected viewers
//!
//! Every connected client receives every topic; there is no per-item
//! subscription filtering. The `topic` tag on the wire matches the
//! original channel names exactly.

use serde::{Deserialize, Serialize};
use types::bid::Bid;
use types::item::Item;

/// A state-change notification fanned out to all connected viewers.
///
/// Serialized as `{"topic": "...", ...payload}` with the record's own
/// fields inlined, so clients can treat the frame as the record plus a
/// topic discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "kebab-case")]
pub enum FeedEvent {
    /// A new item was created
    NewMeme {
        #[serde(flatten)]
        item: Item,
    },

    /// An item's vote counter changed
    VoteUpdate {
        #[serde(flatten)]
        item: Item,
    },

    /// A bid was placed or replaced (carries the full bid row, which
    /// includes the item id)
    NewBid {
        #[serde(flatten)]
        bid: Bid,
    },

    /// An item's caption/vibe was regenerated
    CaptionUpdate {
        #[serde(flatten)]
        item: Item,
        /// Set when regeneration soft-failed and the stored caption was kept
        #[serde(rename = "captionError", default, skip_serializing_if = "std::ops::Not::not")]
        caption_error: bool,
    },
}

impl FeedEvent {
    /// Get the topic as a string label for logging.
    pub fn topic_label(&self) -> &'static str {
        match self {
            FeedEvent::NewMeme { .. } => "new-meme",
            FeedEvent::VoteUpdate { .. } => "vote-update",
            FeedEvent::NewBid { .. } => "new-bid",
            FeedEvent::CaptionUpdate { .. } => "caption-update",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::{BidId, MemeId, UserId};
    use types::numeric::Credits;

    fn sample_item() -> Item {
        Item {
            id: MemeId::new(),
            title: "Doge HODL".to_string(),
            image_url: "https://example.com/doge.png".to_string(),
            tags: vec!["crypto".to_string()],
            caption: None,
            vibe: None,
            upvotes: 3,
            owner_id: UserId::anonymous(),
            created_at: 1708123456789000000,
        }
    }

    #[test]
    fn test_topic_tags_on_wire() {
        let event = FeedEvent::VoteUpdate { item: sample_item() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["topic"], "vote-update");
        assert_eq!(json["upvotes"], 3);
    }

    #[test]
    fn test_new_bid_carries_item_id() {
        let meme_id = MemeId::new();
        let event = FeedEvent::NewBid {
            bid: Bid {
                id: BidId::new(),
                meme_id,
                user_id: UserId::new("bidder"),
                credits: Credits::try_new(100).unwrap(),
                created_at: 1,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["topic"], "new-bid");
        assert_eq!(json["meme_id"], serde_json::to_value(meme_id).unwrap());
    }

    #[test]
    fn test_caption_error_flag_only_when_set() {
        let ok = FeedEvent::CaptionUpdate {
            item: sample_item(),
            caption_error: false,
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert!(json.get("captionError").is_none());

        let failed = FeedEvent::CaptionUpdate {
            item: sample_item(),
            caption_error: true,
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["captionError"], true);
    }

    #[test]
    fn test_topic_label() {
        let event = FeedEvent::NewMeme { item: sample_item() };
        assert_eq!(event.topic_label(), "new-meme");
    }
}
