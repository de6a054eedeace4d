//! Live Feed Service
//!
//! Fans state-change notifications out to all connected viewers:
//! - `new-meme`, `vote-update`, `new-bid`, `caption-update` topics
//! - Bounded per-client queues; lagging clients are disconnected
//! - No replay buffer; late joiners only see subsequent events
//!
//! The broadcaster is an injected dependency of the mutation core, so
//! the core stays testable without a live network layer.

pub mod broadcast;
pub mod events;

pub use broadcast::{Broadcaster, ClientId, FeedConfig};
pub use events::FeedEvent;
