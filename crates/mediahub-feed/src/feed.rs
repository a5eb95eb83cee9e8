//! The capped, time-ordered activity feed.
//!
//! [`ActivityFeed`] owns the only mutable state in the aggregation core: a
//! bounded list of normalized events, always sorted newest-first. It is
//! populated once per cold start by [`bootstrap`] and thereafter mutated
//! one event at a time by [`apply`]. The feed never exceeds its cap, never
//! holds two events with the same id, and treats duplicate or out-of-order
//! deliveries as ordinary input rather than errors.
//!
//! At feed scale (cap of 10 by default) merge-then-sort-then-truncate is
//! all the algorithm there is.
//!
//! [`bootstrap`]: ActivityFeed::bootstrap
//! [`apply`]: ActivityFeed::apply

use std::cmp::Ordering;
use std::collections::BTreeMap;

use mediahub_types::{ActivityEvent, ChangeOp, EventId};

/// Default maximum number of events the feed retains.
pub const DEFAULT_FEED_CAP: usize = 10;

/// Total order for the feed: descending `occurred_at`, ties broken by
/// ascending id. Deterministic across runs and delivery orders.
fn feed_order(a: &ActivityEvent, b: &ActivityEvent) -> Ordering {
    b.occurred_at
        .cmp(&a.occurred_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// A bounded, newest-first feed of activity events.
///
/// The feed is exclusively owned by whoever holds the value; readers get
/// cloned snapshots via [`snapshot`] and cannot corrupt internal state.
///
/// [`snapshot`]: ActivityFeed::snapshot
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    events: Vec<ActivityEvent>,
    cap: usize,
}

impl ActivityFeed {
    /// Create an empty feed with the default cap.
    pub const fn new() -> Self {
        Self {
            events: Vec::new(),
            cap: DEFAULT_FEED_CAP,
        }
    }

    /// Create an empty feed with a custom cap.
    ///
    /// A cap of zero yields a feed that stays permanently empty.
    pub const fn with_cap(cap: usize) -> Self {
        Self {
            events: Vec::new(),
            cap,
        }
    }

    /// Replace the feed wholesale with the top events of `events`.
    ///
    /// Input is deduplicated by id (a later entry replaces an earlier one),
    /// sorted newest-first, and truncated to the cap. Calling this again
    /// with the same input yields the same feed, so a re-bootstrap after a
    /// reconnect is always safe.
    pub fn bootstrap(&mut self, events: Vec<ActivityEvent>) {
        let mut by_id: BTreeMap<EventId, ActivityEvent> = BTreeMap::new();
        for event in events {
            by_id.insert(event.id.clone(), event);
        }

        let mut merged: Vec<ActivityEvent> = by_id.into_values().collect();
        merged.sort_by(feed_order);
        merged.truncate(self.cap);
        self.events = merged;
    }

    /// Apply a single change to the feed.
    ///
    /// Insert and update share replace-or-insert semantics: an existing
    /// event with the same id is replaced in place, otherwise the event is
    /// inserted; the feed is then re-sorted and truncated. Delete removes
    /// the matching id and is a no-op when absent. None of the conditions
    /// that arise from duplicate or out-of-order delivery are errors.
    pub fn apply(&mut self, event: ActivityEvent, op: ChangeOp) {
        match op {
            ChangeOp::Insert | ChangeOp::Update => {
                if let Some(existing) = self.events.iter_mut().find(|e| e.id == event.id) {
                    *existing = event;
                } else {
                    self.events.push(event);
                }
                self.events.sort_by(feed_order);
                self.events.truncate(self.cap);
            }
            ChangeOp::Delete => {
                self.events.retain(|e| e.id != event.id);
            }
        }
    }

    /// Read-only view of the current feed, newest first.
    pub fn events(&self) -> &[ActivityEvent] {
        &self.events
    }

    /// Cloned snapshot of the current feed for rendering.
    pub fn snapshot(&self) -> Vec<ActivityEvent> {
        self.events.clone()
    }

    /// Number of events currently in the feed.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the feed is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The feed's cap.
    pub const fn cap(&self) -> usize {
        self.cap
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new()
    }
}
