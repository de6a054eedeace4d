use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::warn;

use live_feed::FeedEvent;
use types::ids::{MemeId, UserId};
use types::item::{Item, ItemDraft, VoteDirection};

use crate::caption::{CaptionEngine, CaptionError, fallback_caption, fallback_vibe};
use crate::error::AppError;
use crate::models::{CaptionedMeme, CreateMemeRequest, MemeWithBid, VoteRequest};
use crate::state::AppState;

pub async fn create_meme(
    State(state): State<AppState>,
    Json(payload): Json<CreateMemeRequest>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    // Enrichment runs before any store write and outside any item lock;
    // failure degrades to the fallback tables and never blocks creation.
    let (caption, vibe) = enrich_or_fallback(state.captions.as_ref(), &payload.tags).await;

    let draft = ItemDraft {
        title: payload.title,
        image_url: payload.image_url.unwrap_or_else(default_image_url),
        tags: payload.tags,
        caption,
        vibe,
        owner_id: payload.owner_id.unwrap_or_else(UserId::anonymous),
    };

    let item = state.store.put_item(draft, ledger::now_nanos()).await?;
    state.ranking.invalidate_all();
    state.feed.publish(&FeedEvent::NewMeme { item: item.clone() });

    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn list_memes(State(state): State<AppState>) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(state.store.list_items().await?))
}

pub async fn get_meme(
    State(state): State<AppState>,
    Path(id): Path<MemeId>,
) -> Result<Json<MemeWithBid>, AppError> {
    let item = state
        .store
        .get_item(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meme not found".to_string()))?;
    let highest_bid = state.bids.highest_bid(&id).await?;

    Ok(Json(MemeWithBid { item, highest_bid }))
}

pub async fn vote(
    State(state): State<AppState>,
    Path(id): Path<MemeId>,
    Json(payload): Json<VoteRequest>,
) -> Result<Json<Item>, AppError> {
    let direction = VoteDirection::parse(&payload.vote_type)
        .ok_or_else(|| AppError::BadRequest("Invalid vote type".to_string()))?;

    let item = state.votes.apply_vote(&id, direction).await?;
    Ok(Json(item))
}

pub async fn regenerate_caption(
    State(state): State<AppState>,
    Path(id): Path<MemeId>,
) -> Result<Json<CaptionedMeme>, AppError> {
    let item = state
        .store
        .get_item(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meme not found".to_string()))?;

    match enrich(state.captions.as_ref(), &item.tags).await {
        Ok((caption, vibe)) => {
            let updated = state.store.set_item_caption(&id, caption, vibe).await?;
            state.feed.publish(&FeedEvent::CaptionUpdate {
                item: updated.clone(),
                caption_error: false,
            });
            Ok(Json(CaptionedMeme {
                item: updated,
                caption_error: false,
            }))
        }
        // Deliberate soft-fail: keep the stored caption, flag the
        // response, still 200.
        Err(error) => {
            warn!(meme_id = %id, %error, "Caption regeneration failed");
            state.feed.publish(&FeedEvent::CaptionUpdate {
                item: item.clone(),
                caption_error: true,
            });
            Ok(Json(CaptionedMeme {
                item,
                caption_error: true,
            }))
        }
    }
}

async fn enrich(
    engine: &dyn CaptionEngine,
    tags: &[String],
) -> Result<(String, String), CaptionError> {
    let caption = engine.generate_caption(tags).await?;
    let vibe = engine.generate_vibe(tags).await?;
    Ok((caption, vibe))
}

/// Creation-path enrichment: untagged items stay bare, failures fall
/// back to the fixed tables without surfacing an error.
async fn enrich_or_fallback(
    engine: &dyn CaptionEngine,
    tags: &[String],
) -> (Option<String>, Option<String>) {
    if tags.is_empty() {
        return (None, None);
    }
    match enrich(engine, tags).await {
        Ok((caption, vibe)) => (Some(caption), Some(vibe)),
        Err(error) => {
            warn!(%error, "Caption enrichment failed, using fallbacks");
            (
                Some(fallback_caption().to_string()),
                Some(fallback_vibe().to_string()),
            )
        }
    }
}

fn default_image_url() -> String {
    format!(
        "https://picsum.photos/seed/{}/400/300",
        uuid::Uuid::now_v7().simple()
    )
}
