//! WebSocket Protocol Types
//!
//! Message types for client-server communication over the cursor channel.
//! One JSON object per text frame, discriminated by the `type` field.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque session identity. Generated once per connection, stable for the
/// connection's lifetime, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One cursor's position as seen on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    pub id: SessionId,
    pub x: f64,
    pub y: f64,
}

/// Messages sent FROM the client TO the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// The client's pointer moved to (x, y).
    CursorMoved { x: f64, y: f64 },

    /// Request a snapshot of every other session's position.
    GetState,
}

impl ClientMessage {
    /// Wire tags this server understands. Frames carrying any other `type`
    /// are ignored rather than treated as malformed.
    pub const KNOWN_TYPES: &'static [&'static str] = &["cursorMoved", "getState"];
}

/// Messages sent FROM the server TO clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// A new session joined the canvas.
    CursorAdded { cursor: Cursor },

    /// One or more sessions moved. Today the relay always sends a single
    /// move per message; the list shape leaves room for batching.
    #[serde(rename_all = "camelCase")]
    CursorsMoved { moved_cursors: Vec<Cursor> },

    /// Reply to `getState`: every other session's current position.
    GotState { state: Vec<Cursor> },

    /// A session disconnected.
    CursorRemoved { id: SessionId },

    /// The sender's last frame could not be handled.
    Error { message: String },
}
