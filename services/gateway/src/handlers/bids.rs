use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use types::bid::Bid;
use types::ids::MemeId;

use crate::error::AppError;
use crate::models::CreateBidRequest;
use crate::state::AppState;

pub async fn create_bid(
    State(state): State<AppState>,
    Json(payload): Json<CreateBidRequest>,
) -> Result<(StatusCode, Json<Bid>), AppError> {
    let bid = state
        .bids
        .submit_bid(
            &payload.meme_id,
            &payload.user_id,
            payload.credits,
            ledger::now_nanos(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(bid)))
}

pub async fn bids_for_meme(
    State(state): State<AppState>,
    Path(meme_id): Path<MemeId>,
) -> Result<Json<Vec<Bid>>, AppError> {
    Ok(Json(state.bids.bids_for(&meme_id).await?))
}

pub async fn highest_bid(
    State(state): State<AppState>,
    Path(meme_id): Path<MemeId>,
) -> Result<Json<Bid>, AppError> {
    let bid = state
        .bids
        .highest_bid(&meme_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No bids found for this meme".to_string()))?;

    Ok(Json(bid))
}
