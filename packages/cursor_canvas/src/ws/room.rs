//! Room Coordinator
//!
//! Owns the session registry and performs all fan-out. One `Room` instance
//! serves one shared canvas; every mutation and the broadcast it triggers
//! run under a single write-lock acquisition, so registry access is fully
//! serialized. Sends to clients are `try_send` on bounded channels and
//! never block; a failed send evicts that recipient.

use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tracing::{debug, warn};

use crate::metrics::ServerMetrics;
use crate::ws::protocol::{Cursor, ServerMessage, SessionId};
use crate::ws::registry::{Session, SessionRegistry};

pub struct Room {
    registry: RwLock<SessionRegistry>,
    metrics: Arc<ServerMetrics>,
    send_capacity: usize,
}

impl Room {
    pub fn new(send_capacity: usize, metrics: Arc<ServerMetrics>) -> Self {
        Self {
            registry: RwLock::new(SessionRegistry::new()),
            metrics,
            send_capacity,
        }
    }

    /// Register a new session at (0, 0) and announce it to everyone else.
    ///
    /// Returns the fresh session id and the receiver the caller's writer
    /// task must drain. The join never fails: a send failure to any
    /// individual recipient evicts that recipient and the join proceeds.
    pub async fn join(&self) -> (SessionId, mpsc::Receiver<ServerMessage>) {
        let mut registry = self.registry.write().await;
        loop {
            let id = SessionId::generate();
            let (tx, rx) = mpsc::channel(self.send_capacity);
            match registry.register(Session::new(id, tx)) {
                Ok(()) => {
                    Self::broadcast(
                        &mut registry,
                        &self.metrics,
                        Some(id),
                        &ServerMessage::CursorAdded {
                            cursor: Cursor { id, x: 0.0, y: 0.0 },
                        },
                    );
                    self.metrics.session_opened();
                    return (id, rx);
                }
                // Unreachable with v4 ids, but the uniqueness invariant is
                // defended by regenerating rather than clobbering.
                Err(e) => warn!(error = %e, "regenerating session id"),
            }
        }
    }

    /// Apply a position update from `id` and fan it out to everyone else.
    ///
    /// A session that was already removed (evicted mid-broadcast, or
    /// closed by a racing disconnect path) may still have a queued frame
    /// in flight; its move is dropped rather than announced, so peers
    /// never see a cursor that will get no `cursorRemoved`.
    pub async fn move_cursor(&self, id: SessionId, x: f64, y: f64) {
        let mut registry = self.registry.write().await;
        if !registry.update(id, x, y) {
            debug!(session = %id, "dropping move from departed session");
            return;
        }
        Self::broadcast(
            &mut registry,
            &self.metrics,
            Some(id),
            &ServerMessage::CursorsMoved {
                moved_cursors: vec![Cursor { id, x, y }],
            },
        );
    }

    /// Snapshot of every other session's position, for a `getState` reply.
    /// Mutates nothing and broadcasts nothing.
    pub async fn state_for(&self, id: SessionId) -> Vec<Cursor> {
        self.registry.read().await.snapshot_excluding(id)
    }

    /// Deliver a message to `id` alone, on its own outbound channel.
    pub async fn send_to(&self, id: SessionId, message: ServerMessage) {
        let registry = self.registry.read().await;
        if let Some(session) = registry.get(id) {
            match session.tx.try_send(message) {
                Ok(()) => self.metrics.message_sent(),
                Err(e) => {
                    // The session's writer task will notice the closed
                    // socket and leave on its own.
                    debug!(session = %id, error = %e, "dropping reply to unreachable session");
                    self.metrics.message_dropped();
                }
            }
        }
    }

    /// Remove `id` and announce the departure to the remaining sessions.
    /// Idempotent: a second close signal for an already-removed session
    /// is a no-op and emits nothing.
    pub async fn leave(&self, id: SessionId) {
        let mut registry = self.registry.write().await;
        if registry.remove(id).is_none() {
            return;
        }
        self.metrics.session_closed();
        Self::broadcast(
            &mut registry,
            &self.metrics,
            None,
            &ServerMessage::CursorRemoved { id },
        );
    }

    pub async fn session_count(&self) -> usize {
        self.registry.read().await.len()
    }

    /// Best-effort fan-out to every session except `exclude`.
    ///
    /// Failed recipients are collected during iteration and evicted after,
    /// so the loop completes over the remaining recipients without ever
    /// observing mutation; one broken connection never blocks or aborts
    /// delivery to the healthy ones.
    fn broadcast(
        registry: &mut SessionRegistry,
        metrics: &ServerMetrics,
        exclude: Option<SessionId>,
        message: &ServerMessage,
    ) {
        let mut evicted = Vec::new();
        for session in registry.iter_excluding(exclude) {
            match session.tx.try_send(message.clone()) {
                Ok(()) => metrics.message_sent(),
                Err(e) => {
                    debug!(session = %session.id, error = %e, "evicting unreachable session");
                    evicted.push(session.id);
                }
            }
        }
        for id in evicted {
            registry.remove(id);
            metrics.message_dropped();
            metrics.session_closed();
        }
    }
}
