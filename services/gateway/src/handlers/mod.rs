pub mod bids;
pub mod leaderboard;
pub mod memes;
pub mod ws;
