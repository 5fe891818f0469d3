//! WebSocket Handler
//!
//! Per-session connection handling: a writer task draining the session's
//! outbound channel, and a reader loop dispatching inbound events one at
//! a time in arrival order.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info, warn};

use crate::metrics::ServerMetrics;
use crate::ws::protocol::{ClientMessage, ServerMessage};
use crate::ws::room::Room;

/// What to do with one inbound text frame.
#[derive(Debug, PartialEq)]
enum Inbound {
    Event(ClientMessage),
    /// Well-formed JSON object with an unrecognized `type`: ignored.
    Unknown(String),
    /// Anything else: reported back to the sender as an `error` event.
    Malformed(String),
}

fn classify(text: &str) -> Inbound {
    match serde_json::from_str::<ClientMessage>(text) {
        Ok(event) => Inbound::Event(event),
        Err(parse_err) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(serde_json::Value::Object(obj)) => match obj.get("type").and_then(|t| t.as_str()) {
                Some(kind) if !ClientMessage::KNOWN_TYPES.contains(&kind) => {
                    Inbound::Unknown(kind.to_string())
                }
                // Known type with bad fields, or no usable type at all.
                _ => Inbound::Malformed(parse_err.to_string()),
            },
            _ => Inbound::Malformed(parse_err.to_string()),
        },
    }
}

/// Handle one upgraded WebSocket connection for its entire lifetime.
///
/// Joins the room (which announces the new cursor to everyone else),
/// relays inbound events through the room, and leaves on close or error.
/// Leaving is idempotent, so racing close paths are harmless.
pub async fn handle_session(socket: WebSocket, room: Arc<Room>, metrics: Arc<ServerMetrics>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let (id, mut rx) = room.join().await;
    info!(session = %id, "session joined");

    // Writer: sole sender on this socket. Ends when the room drops the
    // session's channel or the socket goes away.
    let writer_task = async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(j) => j,
                Err(e) => {
                    error!(session = %id, "failed to serialize message: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    };

    // Reader: processes this session's events strictly in order.
    let reader_room = room.clone();
    let reader_metrics = metrics.clone();
    let reader_task = async move {
        while let Some(frame) = ws_receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    reader_metrics.message_received();
                    match classify(&text) {
                        Inbound::Event(ClientMessage::CursorMoved { x, y }) => {
                            reader_room.move_cursor(id, x, y).await;
                        }
                        Inbound::Event(ClientMessage::GetState) => {
                            let state = reader_room.state_for(id).await;
                            reader_room
                                .send_to(id, ServerMessage::GotState { state })
                                .await;
                        }
                        Inbound::Unknown(kind) => {
                            debug!(session = %id, kind, "ignoring unrecognized event");
                        }
                        Inbound::Malformed(reason) => {
                            warn!(session = %id, %reason, "malformed event");
                            reader_room
                                .send_to(
                                    id,
                                    ServerMessage::Error {
                                        message: format!("malformed event: {reason}"),
                                    },
                                )
                                .await;
                        }
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!(session = %id, "client closed connection");
                    break;
                }
                // Ping/pong are answered by axum; binary is unsupported.
                Ok(_) => {}
                Err(e) => {
                    warn!(session = %id, error = %e, "websocket error");
                    reader_metrics.websocket_error();
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = writer_task => debug!(session = %id, "writer task ended"),
        _ = reader_task => debug!(session = %id, "reader task ended"),
    }

    room.leave(id).await;
    info!(session = %id, "session left");
}
