//! Table-driven normalization of raw source records into feed events.
//!
//! Source collections are heterogeneous: a media row, a channel row, and a
//! message row share no schema beyond a primary key and a `created_at`
//! column. [`normalize`] reduces any of them to an [`ActivityEvent`] via a
//! static rule table keyed by collection name. Adding a source collection
//! means adding one table entry; the merge logic never changes.
//!
//! Normalization is total. Missing text fields become empty strings, a
//! missing or unparseable timestamp becomes the current process time, and
//! a record without a key gets a generated one (such an event can never be
//! deduplicated or deleted, but it is never dropped).

use chrono::{DateTime, Utc};
use mediahub_types::{ActivityEvent, EventId, EventKind};
use serde_json::Value;
use uuid::Uuid;

/// A single entry in the normalization table.
///
/// Maps one source collection to an event kind plus pure extractors for the
/// title and description.
struct CollectionRule {
    /// Source collection name this rule applies to.
    collection: &'static str,
    /// Event category records from this collection normalize to.
    kind: EventKind,
    /// Title extractor.
    title: fn(&Value) -> String,
    /// Description builder.
    describe: fn(&Value) -> String,
}

/// The normalization table. One entry per known source collection.
const RULES: &[CollectionRule] = &[
    CollectionRule {
        collection: "media",
        kind: EventKind::Media,
        title: media_title,
        describe: media_description,
    },
    CollectionRule {
        collection: "channels",
        kind: EventKind::Channel,
        title: channel_title,
        describe: channel_description,
    },
    CollectionRule {
        collection: "messages",
        kind: EventKind::Message,
        title: message_title,
        describe: message_description,
    },
];

/// Normalize a raw record from `collection` into a feed event.
///
/// Always succeeds. Records from collections without a table entry
/// normalize to [`EventKind::Other`] with a best-effort title.
pub fn normalize(collection: &str, record: &Value) -> ActivityEvent {
    let rule = RULES.iter().find(|r| r.collection == collection);

    let (kind, title, description) = rule.map_or_else(
        || (EventKind::Other, fallback_title(record), String::new()),
        |r| (r.kind, (r.title)(record), (r.describe)(record)),
    );

    ActivityEvent {
        id: EventId::scoped(collection, &record_key(record)),
        kind,
        title,
        description,
        occurred_at: occurred_at(record),
    }
}

// ---------------------------------------------------------------------------
// Per-collection extractors
// ---------------------------------------------------------------------------

fn media_title(record: &Value) -> String {
    string_field(record, "file_name")
}

fn media_description(record: &Value) -> String {
    let media_type = string_field(record, "media_type");
    if media_type.is_empty() {
        String::from("New file uploaded")
    } else {
        format!("New {media_type} uploaded")
    }
}

fn channel_title(record: &Value) -> String {
    string_field(record, "title")
}

fn channel_description(record: &Value) -> String {
    // An absent flag reads as inactive, matching the boolean column's
    // treatment in the dashboard.
    if record.get("is_active").and_then(Value::as_bool) == Some(true) {
        String::from("Channel activated")
    } else {
        String::from("Channel deactivated")
    }
}

fn message_title(record: &Value) -> String {
    string_field(record, "sender_name")
}

fn message_description(_record: &Value) -> String {
    String::from("New message posted")
}

/// Best-effort title for records from unrecognized collections.
fn fallback_title(record: &Value) -> String {
    for field in ["title", "name", "file_name"] {
        let value = string_field(record, field);
        if !value.is_empty() {
            return value;
        }
    }
    String::new()
}

// ---------------------------------------------------------------------------
// Field access helpers
// ---------------------------------------------------------------------------

/// Read a string field, defaulting to empty on absence or wrong type.
fn string_field(record: &Value, field: &str) -> String {
    record
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// The record's primary key as a string.
///
/// String and numeric keys are both accepted. A record without a usable
/// key gets a generated v4 UUID so normalization stays total.
fn record_key(record: &Value) -> String {
    match record.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => Uuid::new_v4().to_string(),
    }
}

/// The record's `created_at` timestamp, or the current process time when
/// absent or unparseable.
fn occurred_at(record: &Value) -> DateTime<Utc> {
    record
        .get("created_at")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map_or_else(Utc::now, |parsed| parsed.with_timezone(&Utc))
}
