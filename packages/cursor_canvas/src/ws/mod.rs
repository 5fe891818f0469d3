//! Cursor Relay Core
//!
//! - `protocol` — wire message types for the cursor channel
//! - `registry` — who is connected and where
//! - `room` — the coordinator: serialized mutation + best-effort fan-out
//! - `handler` — per-connection reader/writer tasks

mod handler;
mod protocol;
mod registry;
mod room;

pub use handler::handle_session;
pub use protocol::{ClientMessage, Cursor, ServerMessage, SessionId};
pub use registry::{Session, SessionRegistry};
pub use room::Room;
