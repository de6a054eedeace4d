use serde::{Deserialize, Serialize};

use types::bid::Bid;
use types::ids::{MemeId, UserId};
use types::item::Item;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMemeRequest {
    pub title: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub owner_id: Option<UserId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoteRequest {
    /// `"up"` or `"down"`; anything else is rejected explicitly
    #[serde(rename = "type")]
    pub vote_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBidRequest {
    pub meme_id: MemeId,
    pub user_id: UserId,
    /// Raw caller-supplied number; validated by the ledger
    pub credits: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    10
}

/// Item detail response with the derived highest bid merged in.
#[derive(Debug, Clone, Serialize)]
pub struct MemeWithBid {
    #[serde(flatten)]
    pub item: Item,
    pub highest_bid: Option<Bid>,
}

/// Caption regeneration response; `captionError` appears only when the
/// enrichment call soft-failed and the stored caption was kept.
#[derive(Debug, Clone, Serialize)]
pub struct CaptionedMeme {
    #[serde(flatten)]
    pub item: Item,
    #[serde(rename = "captionError", skip_serializing_if = "std::ops::Not::not")]
    pub caption_error: bool,
}
