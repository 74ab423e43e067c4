//! Engine error taxonomy.
//!
//! `Unauthorized` is deliberately absent: authorization is decided by
//! the request layer, never by the engine.

use crate::board::BoardId;
use thiserror::Error;

/// Errors surfaced by board mutation and lookup operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An id supplied as the referent of an operation does not resolve:
    /// the board being mutated, or a source/destination column.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// A well-formed id with no matching entity: a board on the read
    /// path, or a task that is no longer where the caller left it.
    #[error("not found: {0}")]
    NotFound(String),

    /// Optimistic write collision (or a timed-out write that may have
    /// landed). The caller retries from a fresh load.
    #[error("write conflict on board {0}")]
    Conflict(BoardId),

    /// Storage backend failure.
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    pub fn invalid_ref(what: impl Into<String>) -> Self {
        Self::InvalidReference(what.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;
