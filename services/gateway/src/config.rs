use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Gateway configuration, loaded once at startup from the environment.
pub struct Config {
    pub port: u16,
    /// Ranking snapshot TTL in seconds
    pub ranking_ttl_secs: u64,
    /// Ranking snapshot width; requests up to this limit slice the cache
    pub ranking_cap: usize,
    /// Outbound queue capacity per connected feed client
    pub feed_queue_capacity: usize,
    /// Enrichment API key; absent means permanent fallback mode
    pub caption_api_key: Option<String>,
    pub caption_model: String,
    /// Bounded timeout for enrichment calls, in seconds
    pub caption_timeout_secs: u64,
}

impl Config {
    pub fn load() -> Self {
        let caption_api_key = env::var("GEMINI_API_KEY").ok().filter(|key| !key.is_empty());
        if caption_api_key.is_none() {
            warn!("GEMINI_API_KEY not set; caption enrichment will use fallback content");
        }

        Self {
            port: try_load("PORT", "5000"),
            ranking_ttl_secs: try_load("RANKING_TTL_SECS", "60"),
            ranking_cap: try_load("RANKING_CACHE_CAP", "100"),
            feed_queue_capacity: try_load("FEED_QUEUE_CAPACITY", "256"),
            caption_api_key,
            caption_model: env::var("CAPTION_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            caption_timeout_secs: try_load("CAPTION_TIMEOUT_SECS", "5"),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
