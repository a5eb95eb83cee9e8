//! Observer API server for the Media Hub activity feed.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/feed`) for real-time feed update
//!   streaming via [`tokio::sync::broadcast`]
//! - **REST endpoints** for reading the current feed
//! - **Minimal HTML status page** (`GET /`) showing feed metrics and
//!   links to the API endpoints
//!
//! # Architecture
//!
//! The observer reads from a published in-memory feed snapshot that the
//! feed loop updates after every mutation. REST reads never touch the
//! database or the change stream, and never block the loop. `WebSocket`
//! clients receive feed updates via a broadcast channel with automatic
//! lag handling.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{spawn_observer, start_server, ServerConfig, ServerError};
pub use state::{AppState, FeedBroadcast};
