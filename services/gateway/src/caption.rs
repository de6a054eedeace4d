//! Caption enrichment boundary
//!
//! Items are optionally decorated with AI-generated caption and vibe
//! text. The call is failable by contract: any transport, auth, or
//! response-shape problem becomes a `CaptionError`, and callers degrade
//! to the fixed fallback tables. Results are cached per exact tag
//! sequence, so repeated calls are idempotent-safe.
//!
//! Enrichment never runs inside an item's critical section.

use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Fixed fallback captions used when enrichment fails at creation time.
pub const FALLBACK_CAPTIONS: [&str; 10] = [
    "YOLO to the moon!",
    "Hack the planet!",
    "When the code finally compiles",
    "HODL the vibes!",
    "404: Brain not found",
    "Cyberpunk dreams, meme reality",
    "Neural networks and chill",
    "This meme is quantum-encrypted",
    "Glitch in the matrix detected",
    "Running on blockchain technology",
];

/// Fixed fallback vibe labels.
pub const FALLBACK_VIBES: [&str; 8] = [
    "Neon Crypto Chaos",
    "Retro Stonks Vibes",
    "Digital Doge Dreams",
    "Glitchy Tech Nostalgia",
    "Cybernetic Meme Energy",
    "Synthwave Humor Matrix",
    "Neo Tokyo Laughter",
    "Quantum Meme State",
];

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("Caption service not configured")]
    Disabled,

    #[error("Caption request failed: {0}")]
    Http(String),

    #[error("Malformed caption response")]
    MalformedResponse,
}

/// Text-generation boundary consumed by the item creation and
/// regeneration paths.
#[async_trait]
pub trait CaptionEngine: Send + Sync {
    async fn generate_caption(&self, tags: &[String]) -> Result<String, CaptionError>;
    async fn generate_vibe(&self, tags: &[String]) -> Result<String, CaptionError>;
}

/// Gemini-backed caption engine with a per-tag-sequence response cache.
pub struct GeminiCaptioner {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    cache: DashMap<String, String>,
}

impl GeminiCaptioner {
    pub fn new(api_key: Option<String>, model: String, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: GEMINI_BASE_URL.to_string(),
            api_key,
            model,
            cache: DashMap::new(),
        }
    }

    async fn generate(&self, cache_key: String, prompt: String) -> Result<String, CaptionError> {
        if let Some(hit) = self.cache.get(&cache_key) {
            debug!(key = %cache_key, "Caption cache hit");
            return Ok(hit.clone());
        }

        let api_key = self.api_key.as_ref().ok_or(CaptionError::Disabled)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| CaptionError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CaptionError::Http(format!(
                "status {}",
                response.status()
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|_| CaptionError::MalformedResponse)?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(CaptionError::MalformedResponse)?;

        self.cache.insert(cache_key, text.clone());
        Ok(text)
    }
}

#[async_trait]
impl CaptionEngine for GeminiCaptioner {
    async fn generate_caption(&self, tags: &[String]) -> Result<String, CaptionError> {
        let prompt = format!(
            "Generate a single funny caption for a meme with tags: {}. \
             Keep it short, witty, and on a single line. Do not include options, \
             numbering, or markdown formatting. Just return a single caption.",
            tags.join(", ")
        );
        let raw = self
            .generate(format!("caption-{}", tags.join("-")), prompt)
            .await?;
        Ok(cleanup_caption(&raw))
    }

    async fn generate_vibe(&self, tags: &[String]) -> Result<String, CaptionError> {
        let prompt = format!(
            "Describe the vibe of a meme with tags: {} in a single word or very \
             short phrase (max 3 words). Make it sound cyberpunk and trendy. \
             No markdown, no newlines, no punctuation at the end.",
            tags.join(", ")
        );
        let raw = self
            .generate(format!("vibe-{}", tags.join("-")), prompt)
            .await?;
        Ok(cleanup_vibe(&raw))
    }
}

/// Pick a fallback caption uniformly at random.
pub fn fallback_caption() -> &'static str {
    FALLBACK_CAPTIONS[rand::thread_rng().gen_range(0..FALLBACK_CAPTIONS.len())]
}

/// Pick a fallback vibe uniformly at random.
pub fn fallback_vibe() -> &'static str {
    FALLBACK_VIBES[rand::thread_rng().gen_range(0..FALLBACK_VIBES.len())]
}

/// Strip the `**Caption:**` prefix and any trailing `**Tags:**` section
/// the model sometimes emits despite the prompt.
fn cleanup_caption(raw: &str) -> String {
    let mut caption = raw.trim();
    if let Some(rest) = strip_prefix_ignore_ascii_case(caption, "**Caption:**") {
        caption = rest.trim_start();
    }
    if let Some(idx) = find_ignore_ascii_case(caption, "**Tags:**") {
        caption = &caption[..idx];
    }
    caption.trim().to_string()
}

/// Drop markdown bold markers and collapse newlines to spaces.
fn cleanup_vibe(raw: &str) -> String {
    raw.replace("**", "").replace('\n', " ").trim().to_string()
}

fn strip_prefix_ignore_ascii_case<'a>(haystack: &'a str, prefix: &str) -> Option<&'a str> {
    if haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
    {
        Some(&haystack[prefix.len()..])
    } else {
        None
    }
}

// Returns a byte offset; the marker starts with an ASCII byte, so the
// offset is always a char boundary.
fn find_ignore_ascii_case(haystack: &str, marker: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker.as_bytes()))
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: String,
}
