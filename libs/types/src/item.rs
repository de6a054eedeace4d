//! Marketplace item types
//!
//! An item is a user-submitted, votable, biddable unit of content. Only
//! the vote aggregator mutates its counter and only the enrichment path
//! mutates its caption/vibe; items are never deleted.

use crate::ids::{MemeId, UserId};
use serde::{Deserialize, Serialize};

/// A user-submitted item as stored and served
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: MemeId,
    pub title: String,
    pub image_url: String,
    /// Tag order is significant for display truncation
    pub tags: Vec<String>,
    pub caption: Option<String>,
    pub vibe: Option<String>,
    /// Signed by design: symmetric up/down handling can drive it negative
    pub upvotes: i64,
    pub owner_id: UserId,
    /// Unix nanos, assigned by the store at insertion
    pub created_at: i64,
}

/// Fields supplied by the caller when creating an item.
///
/// The store assigns `id` and `created_at`; the counter starts at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub title: String,
    pub image_url: String,
    pub tags: Vec<String>,
    pub caption: Option<String>,
    pub vibe: Option<String>,
    pub owner_id: UserId,
}

/// Vote direction applied to an item's counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// Counter delta for this direction
    pub fn delta(&self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }

    /// Parse the wire value (`"up"` / `"down"`); anything else is invalid
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(VoteDirection::Up),
            "down" => Some(VoteDirection::Down),
            _ => None,
        }
    }
}
