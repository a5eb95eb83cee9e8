//! Enumeration types for the Media Hub activity feed.
//!
//! The feed merges events from several source collections into a small set
//! of categories. Categories are a fixed, extensible set: adding a new
//! source collection adds a normalizer rule, not a merge-logic change.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event categories
// ---------------------------------------------------------------------------

/// Category of a normalized feed event.
///
/// Unrecognized source collections normalize to [`EventKind::Other`] rather
/// than being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A media asset was uploaded or changed.
    Media,
    /// A message was posted.
    Message,
    /// A channel changed state (activated, deactivated, renamed).
    Channel,
    /// Fallback for records from unrecognized collections.
    Other,
}

// ---------------------------------------------------------------------------
// Change operations
// ---------------------------------------------------------------------------

/// Operation kind carried by a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOp {
    /// A row was inserted into a source collection.
    Insert,
    /// An existing row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

impl ChangeOp {
    /// Parse an operation token as published on the change stream.
    ///
    /// Accepts both the lowercase subject segment (`insert`) and the
    /// uppercase replication tag (`INSERT`). Returns `None` for anything
    /// else; unknown operations are skipped by the listener.
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "insert" => Some(Self::Insert),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    /// The lowercase token used in change-stream subjects.
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation icons
// ---------------------------------------------------------------------------

/// Symbolic icon identifier for a feed entry.
///
/// A pure presentation hint: the dashboard maps each identifier to a glyph.
/// Every known [`EventKind`] maps to a distinct icon; unknown kinds fall
/// back to [`FeedIcon::File`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "kebab-case")]
pub enum FeedIcon {
    /// Image/photo glyph for media events.
    Image,
    /// Speech-bubble glyph for message events.
    MessageBubble,
    /// Antenna glyph for channel state changes.
    Broadcast,
    /// Generic file glyph, the default.
    File,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&EventKind::Media).unwrap_or_default();
        assert_eq!(json, "\"media\"");
    }

    #[test]
    fn op_parses_both_cases() {
        assert_eq!(ChangeOp::parse("insert"), Some(ChangeOp::Insert));
        assert_eq!(ChangeOp::parse("UPDATE"), Some(ChangeOp::Update));
        assert_eq!(ChangeOp::parse("Delete"), Some(ChangeOp::Delete));
    }

    #[test]
    fn op_rejects_unknown_tokens() {
        assert_eq!(ChangeOp::parse("truncate"), None);
        assert_eq!(ChangeOp::parse(""), None);
    }

    #[test]
    fn op_token_round_trips() {
        for op in [ChangeOp::Insert, ChangeOp::Update, ChangeOp::Delete] {
            assert_eq!(ChangeOp::parse(op.as_token()), Some(op));
        }
    }

    #[test]
    fn icon_serializes_kebab_case() {
        let json = serde_json::to_string(&FeedIcon::MessageBubble).unwrap_or_default();
        assert_eq!(json, "\"message-bubble\"");
    }
}
