//! Session Registry
//!
//! The single source of truth for who is connected and where. Owned
//! exclusively by the [`Room`](super::Room); all access goes through the
//! operations below.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tokio::sync::mpsc;

use crate::error::RegistryError;
use crate::ws::protocol::{Cursor, ServerMessage, SessionId};

/// One connected client: identity, last-known position, and the outbound
/// channel drained by that client's writer task. The sender is owned
/// solely by this entry; removal is the only way to stop delivery.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub x: f64,
    pub y: f64,
    pub tx: mpsc::Sender<ServerMessage>,
}

impl Session {
    pub fn new(id: SessionId, tx: mpsc::Sender<ServerMessage>) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            tx,
        }
    }

    pub fn cursor(&self) -> Cursor {
        Cursor {
            id: self.id,
            x: self.x,
            y: self.y,
        }
    }
}

/// Mapping from session id to session, unique keys.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new session. Fails if the id is already present.
    pub fn register(&mut self, session: Session) -> Result<(), RegistryError> {
        match self.sessions.entry(session.id) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateId(session.id)),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(())
            }
        }
    }

    /// Remove a session. Absent ids are a no-op: concurrent disconnect
    /// paths may race to remove the same id.
    pub fn remove(&mut self, id: SessionId) -> Option<Session> {
        self.sessions.remove(&id)
    }

    /// Update a session's position. Returns false (and changes nothing)
    /// if the session is already gone, so callers can avoid announcing
    /// moves for departed sessions.
    pub fn update(&mut self, id: SessionId, x: f64, y: f64) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.x = x;
                session.y = y;
                true
            }
            None => false,
        }
    }

    /// Positions of every session except `exclude`. Order is unspecified.
    pub fn snapshot_excluding(&self, exclude: SessionId) -> Vec<Cursor> {
        self.sessions
            .values()
            .filter(|s| s.id != exclude)
            .map(Session::cursor)
            .collect()
    }

    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Iterate current sessions for fan-out, excluding the originator
    /// where applicable. Callers must not mutate during iteration; failed
    /// recipients are collected and removed afterwards.
    pub fn iter_excluding(&self, exclude: Option<SessionId>) -> impl Iterator<Item = &Session> {
        self.sessions.values().filter(move |s| Some(s.id) != exclude)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
