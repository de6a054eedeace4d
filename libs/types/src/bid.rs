//! Bid types
//!
//! A bid is a credit offer by a user against an item. The ledger keeps
//! at most one live row per (item, bidder); a repeat bid replaces the
//! amount on the existing row.

use crate::ids::{BidId, MemeId, UserId};
use crate::numeric::Credits;
use serde::{Deserialize, Serialize};

/// A single live bid row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub meme_id: MemeId,
    pub user_id: UserId,
    pub credits: Credits,
    /// Unix nanos; refreshed when the row is replaced
    pub created_at: i64,
}

impl Bid {
    /// Ordering key for the highest-bid view: max credits wins, ties
    /// broken by earliest timestamp.
    pub fn beats(&self, other: &Bid) -> bool {
        match self.credits.cmp(&other.credits) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.created_at < other.created_at,
        }
    }
}
