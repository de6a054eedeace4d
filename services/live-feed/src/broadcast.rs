//! Non-blocking fan-out of feed events to connected viewers
//!
//! Each connected client gets a bounded outbound queue. Publishing
//! serializes the event once and `try_send`s to every queue; a full
//! queue disconnects that client rather than stalling the mutator.
//! There is no replay buffer: a client connecting after a publish never
//! receives it.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::events::FeedEvent;

/// Unique identifier for a connected client.
pub type ClientId = u64;

/// Configuration for the broadcaster.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Maximum queued outbound frames per client before it is
    /// considered lagging and disconnected.
    pub queue_capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { queue_capacity: 256 }
    }
}

/// Fans feed events out to every connected client.
///
/// Delivery is best-effort and at-most-once per connected client per
/// publish call. Events published by operations serialized under one
/// item's lock are enqueued in that same order for every client.
pub struct Broadcaster {
    clients: DashMap<ClientId, mpsc::Sender<String>>,
    next_id: AtomicU64,
    config: FeedConfig,
    /// Total publishes that failed to reach at least one client.
    events_dropped: AtomicU64,
}

impl Broadcaster {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            clients: DashMap::new(),
            next_id: AtomicU64::new(1),
            config,
            events_dropped: AtomicU64::new(0),
        }
    }

    /// Register a new client; returns its ID and the receiving half of
    /// its outbound queue.
    pub fn register(&self) -> (ClientId, mpsc::Receiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.config.queue_capacity);
        self.clients.insert(id, tx);
        debug!(client_id = id, "Registered feed client");
        (id, rx)
    }

    /// Remove a client (disconnect). Returns whether it was connected.
    pub fn disconnect(&self, client_id: ClientId) -> bool {
        let removed = self.clients.remove(&client_id).is_some();
        if removed {
            debug!(client_id, "Removed feed client");
        }
        removed
    }

    /// Fan an event out to every connected client.
    ///
    /// Never blocks and never fails the caller. Lagging clients (full
    /// queue) are disconnected; closed queues are pruned.
    pub fn publish(&self, event: &FeedEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(topic = event.topic_label(), %error, "Failed to encode feed event");
                return;
            }
        };

        let mut stale = Vec::new();
        for entry in self.clients.iter() {
            match entry.value().try_send(payload.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    self.events_dropped.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        client_id = *entry.key(),
                        topic = event.topic_label(),
                        "Disconnecting lagging feed client"
                    );
                    stale.push(*entry.key());
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    stale.push(*entry.key());
                }
            }
        }

        for client_id in stale {
            self.clients.remove(&client_id);
        }
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Total events dropped on full client queues.
    pub fn events_dropped(&self) -> u64 {
        self.events_dropped.load(Ordering::Relaxed)
    }
}
