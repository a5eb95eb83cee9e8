//! Shared application state for the Observer API server.
//!
//! [`AppState`] holds the broadcast channel for feed updates and the
//! in-memory feed snapshot the REST endpoints serve. The feed loop owns
//! the authoritative feed; the observer only ever sees published copies,
//! so a slow or misbehaving client can never corrupt aggregator state.

use std::sync::Arc;

use mediahub_types::ActivityEvent;
use tokio::sync::{broadcast, RwLock};

/// Capacity of the broadcast channel for feed updates.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// JSON-serializable feed update pushed over the `WebSocket`.
///
/// Carries the whole feed: it is capped at a handful of events, so a full
/// copy per update is cheaper than any delta scheme would be to get right.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedBroadcast {
    /// The current feed, newest first.
    pub events: Vec<ActivityEvent>,
}

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor. The
/// broadcast sender pushes feed updates to all connected `WebSocket`
/// clients; the snapshot behind the read-write lock serves REST reads.
#[derive(Clone)]
pub struct AppState {
    /// Broadcast sender for feed update messages.
    pub tx: broadcast::Sender<FeedBroadcast>,
    /// The latest published feed snapshot, newest first.
    pub feed: Arc<RwLock<Vec<ActivityEvent>>>,
}

impl AppState {
    /// Create a new application state with an empty feed.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            tx,
            feed: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe to the feed broadcast channel.
    ///
    /// Returns a receiver that will yield a [`FeedBroadcast`] for every
    /// feed mutation the loop publishes.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedBroadcast> {
        self.tx.subscribe()
    }

    /// Publish a feed update to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, update: &FeedBroadcast) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(update.clone()).unwrap_or(0)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_without_subscribers_reports_zero() {
        let state = AppState::new();
        let sent = state.broadcast(&FeedBroadcast { events: Vec::new() });
        assert_eq!(sent, 0);
    }

    #[tokio::test]
    async fn subscribers_receive_published_updates() {
        let state = AppState::new();
        let mut rx = state.subscribe();

        let sent = state.broadcast(&FeedBroadcast { events: Vec::new() });
        assert_eq!(sent, 1);

        let update = rx.recv().await.unwrap_or(FeedBroadcast {
            events: vec![],
        });
        assert!(update.events.is_empty());
    }
}
