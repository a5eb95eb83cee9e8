//! Identifier type for feed events.
//!
//! Feed events come from heterogeneous source collections whose native keys
//! are opaque strings (the hosted database uses UUIDs, but the aggregator
//! never inspects them). [`EventId`] scopes a record key by the collection
//! it came from, so records with the same key in different collections never
//! collide in the feed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Opaque unique identifier for a feed event.
///
/// Formed as `{collection}:{record-key}`. The composite shape guarantees
/// uniqueness per (source collection, record) pair, and its lexicographic
/// ordering gives the feed a deterministic tie-break for events that share
/// a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventId(String);

impl EventId {
    /// Build an id for a record key scoped to its source collection.
    pub fn scoped(collection: &str, key: &str) -> Self {
        Self(format!("{collection}:{key}"))
    }

    /// View the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for EventId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EventId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_ids_are_collection_qualified() {
        let id = EventId::scoped("media", "42");
        assert_eq!(id.as_str(), "media:42");
    }

    #[test]
    fn same_key_different_collection_differs() {
        let a = EventId::scoped("media", "7");
        let b = EventId::scoped("channels", "7");
        assert_ne!(a, b);
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = EventId::scoped("channels", "1");
        let b = EventId::scoped("media", "1");
        assert!(a < b);
    }
}
