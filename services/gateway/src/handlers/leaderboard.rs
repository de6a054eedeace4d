use axum::{
    Json,
    extract::{Query, State},
};

use types::item::Item;

use crate::error::AppError;
use crate::models::LeaderboardQuery;
use crate::state::AppState;

pub async fn top(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(state.ranking.top_items(query.limit).await?))
}

pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    Ok(Json(state.ranking.trending_items(query.limit).await?))
}
