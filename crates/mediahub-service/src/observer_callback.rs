//! Feed callback that updates the Observer API state.
//!
//! After each feed mutation, this callback publishes the new snapshot to
//! the observer's shared state and broadcasts a [`FeedBroadcast`] to all
//! connected `WebSocket` clients.

use std::sync::Arc;

use tracing::debug;

use mediahub_feed::service::FeedCallback;
use mediahub_observer::state::{AppState, FeedBroadcast};
use mediahub_types::ActivityEvent;

/// Callback that bridges the feed loop to the Observer API.
pub struct ObserverCallback {
    state: Arc<AppState>,
}

impl ObserverCallback {
    /// Create a new observer callback backed by the given app state.
    pub const fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl FeedCallback for ObserverCallback {
    fn on_feed_updated(&mut self, feed: &[ActivityEvent]) {
        let events = feed.to_vec();

        // Broadcast to WebSocket clients.
        let receivers = self.state.broadcast(&FeedBroadcast {
            events: events.clone(),
        });
        debug!(feed_len = events.len(), receivers, "feed update broadcast");

        // Update the REST snapshot. Use try_write to avoid blocking the
        // feed loop -- if a handler holds the read lock, skip this update;
        // the next mutation will catch up.
        if let Ok(mut snapshot) = self.state.feed.try_write() {
            *snapshot = events;
        }
    }
}
