use crate::handlers::{bids, leaderboard, memes, ws};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/memes", post(memes::create_meme).get(memes::list_memes))
        .route("/memes/{id}", get(memes::get_meme))
        .route("/memes/{id}/vote", post(memes::vote))
        .route("/memes/{id}/caption", post(memes::regenerate_caption))
        .route("/bids", post(bids::create_bid))
        .route("/bids/meme/{meme_id}", get(bids::bids_for_meme))
        .route("/bids/meme/{meme_id}/highest", get(bids::highest_bid))
        .route("/leaderboard/top", get(leaderboard::top))
        .route("/leaderboard/trending", get(leaderboard::trending))
        .route("/health", get(health));

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "Meme marketplace API is running"
}
