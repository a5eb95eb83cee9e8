//! REST API endpoint handlers for the Observer server.
//!
//! All handlers read from the published feed snapshot via the shared
//! [`AppState`]; none of them touch the database or the change stream.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/api/feed` | The current feed, newest first |
//! | `GET` | `/api/feed/{id}` | A single feed entry by event id |

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use axum::Json;
use mediahub_feed::icon_for;
use mediahub_types::{ActivityEvent, EventKind, FeedIcon};

use crate::error::ObserverError;
use crate::state::AppState;

/// A feed entry as served to the dashboard: the event plus its
/// presentation icon.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeedEntry {
    /// The normalized event.
    #[serde(flatten)]
    pub event: ActivityEvent,
    /// Symbolic icon identifier for the event's category.
    pub icon: FeedIcon,
}

impl From<ActivityEvent> for FeedEntry {
    fn from(event: ActivityEvent) -> Self {
        let icon = icon_for(event.kind);
        Self { event, icon }
    }
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page showing server status and API links.
///
/// A development aid; the real dashboard consumes `/api/feed` and
/// `/ws/feed`.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let feed = state.feed.read().await;
    let total = feed.len();
    let media = count_kind(&feed, EventKind::Media);
    let messages = count_kind(&feed, EventKind::Message);
    let channels = count_kind(&feed, EventKind::Channel);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Media Hub Observer</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.5rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        li::before {{ content: "GET "; color: #7ee787; font-weight: bold; }}
        .status {{ color: #3fb950; font-weight: bold; }}
    </style>
</head>
<body>
    <h1>Media Hub Observer</h1>
    <p class="subtitle">Activity feed monitoring server</p>

    <p>Status: <span class="status">RUNNING</span></p>

    <div>
        <div class="metric">
            <div class="label">Feed events</div>
            <div class="value">{total}</div>
        </div>
        <div class="metric">
            <div class="label">Media</div>
            <div class="value">{media}</div>
        </div>
        <div class="metric">
            <div class="label">Messages</div>
            <div class="value">{messages}</div>
        </div>
        <div class="metric">
            <div class="label">Channels</div>
            <div class="value">{channels}</div>
        </div>
    </div>

    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/feed">/api/feed</a> -- Current feed, newest first</li>
        <li>/api/feed/:id -- Single feed entry</li>
    </ul>

    <h2>WebSocket</h2>
    <ul>
        <li style="list-style:none;"><code>ws://host:port/ws/feed</code> -- Live feed update stream</li>
    </ul>
</body>
</html>"#
    ))
}

fn count_kind(feed: &[ActivityEvent], kind: EventKind) -> usize {
    feed.iter().filter(|e| e.kind == kind).count()
}

// ---------------------------------------------------------------------------
// GET /api/feed -- the current feed
// ---------------------------------------------------------------------------

/// Return the current feed, newest first, each entry with its icon.
pub async fn get_feed(State(state): State<Arc<AppState>>) -> Json<Vec<FeedEntry>> {
    let feed = state.feed.read().await;
    Json(feed.iter().cloned().map(FeedEntry::from).collect())
}

// ---------------------------------------------------------------------------
// GET /api/feed/{id} -- a single feed entry
// ---------------------------------------------------------------------------

/// Return the feed entry with the given event id, or 404.
///
/// The id is the collection-scoped form, e.g. `media:42`.
pub async fn get_feed_entry(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FeedEntry>, ObserverError> {
    let feed = state.feed.read().await;
    feed.iter()
        .find(|e| e.id.as_str() == id)
        .cloned()
        .map(FeedEntry::from)
        .map(Json)
        .ok_or_else(|| ObserverError::NotFound(format!("no feed entry with id {id}")))
}
