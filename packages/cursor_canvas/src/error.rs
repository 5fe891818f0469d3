use thiserror::Error;

use crate::ws::SessionId;

/// Errors raised by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A session with this id is already registered. Practically
    /// unreachable with v4 ids; callers regenerate and retry.
    #[error("session id {0} is already registered")]
    DuplicateId(SessionId),
}
