//! Board storage with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `sqlite`: SQLite database, one row per board aggregate
//!
//! Every backend stores whole aggregates and exposes an optimistic
//! `replace`: the write only lands if the stored version still matches
//! the version the caller loaded, so two read-transform-write sequences
//! can never silently clobber each other.

mod memory;
mod sqlite;

pub use memory::InMemoryBoardStore;
pub use sqlite::SqliteBoardStore;

use crate::board::{Board, BoardId};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The aggregate changed since it was loaded; retry from a fresh
    /// load.
    #[error("stale version for board")]
    Conflict,

    /// A board with the same id already exists.
    #[error("board already exists")]
    AlreadyExists,

    /// Backend failure (I/O, serialization, ...).
    #[error("storage backend: {0}")]
    Backend(String),
}

/// Board store trait - implemented by all storage backends.
#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// Insert a new board aggregate at version 1.
    async fn insert(&self, board: &Board) -> Result<(), StoreError>;

    /// Load a board aggregate and its current version.
    async fn load(&self, id: BoardId) -> Result<Option<(Board, u64)>, StoreError>;

    /// Replace the whole aggregate, conditioned on `expected_version`
    /// still being current. Returns the new version.
    async fn replace(
        &self,
        id: BoardId,
        board: &Board,
        expected_version: u64,
    ) -> Result<u64, StoreError>;

    /// Delete a board aggregate. Returns whether anything was removed.
    async fn delete(&self, id: BoardId) -> Result<bool, StoreError>;

    /// List all boards owned by the given identity.
    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Board>, StoreError>;
}

/// Board store type selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreType {
    Memory,
    #[default]
    Sqlite,
}

impl StoreType {
    /// Parse from environment variable value.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" => Self::Memory,
            "sqlite" | "db" => Self::Sqlite,
            _ => Self::default(),
        }
    }
}

/// Create a board store based on type and configuration.
pub async fn create_board_store(
    store_type: StoreType,
    base_dir: PathBuf,
) -> Result<Box<dyn BoardStore>, StoreError> {
    match store_type {
        StoreType::Memory => Ok(Box::new(InMemoryBoardStore::new())),
        StoreType::Sqlite => {
            let store = SqliteBoardStore::new(base_dir).await?;
            Ok(Box::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardId, Column};

    fn board(owner: &str) -> Board {
        Board {
            id: BoardId::new(),
            owner: owner.to_string(),
            name: "Test".to_string(),
            columns: vec![Column::new(1, "Todo")],
        }
    }

    #[test]
    fn test_store_type_parsing() {
        assert_eq!(StoreType::parse("memory"), StoreType::Memory);
        assert_eq!(StoreType::parse("SQLITE"), StoreType::Sqlite);
        assert_eq!(StoreType::parse("db"), StoreType::Sqlite);
        assert_eq!(StoreType::parse("anything-else"), StoreType::Sqlite);
    }

    #[tokio::test]
    async fn test_replace_rejects_stale_version() {
        let store = InMemoryBoardStore::new();
        let b = board("user@example.com");
        store.insert(&b).await.unwrap();

        let (loaded, version) = store.load(b.id).await.unwrap().expect("board stored");
        assert_eq!(version, 1);

        let v2 = store.replace(b.id, &loaded, version).await.unwrap();
        assert_eq!(v2, 2);

        // A second writer still holding version 1 must be rejected.
        let err = store.replace(b.id, &loaded, version).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let store = InMemoryBoardStore::new();
        let b = board("user@example.com");
        store.insert(&b).await.unwrap();
        let err = store.insert(&b).await.unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_list_by_owner_filters() {
        let store = InMemoryBoardStore::new();
        store.insert(&board("a@example.com")).await.unwrap();
        store.insert(&board("a@example.com")).await.unwrap();
        store.insert(&board("b@example.com")).await.unwrap();

        assert_eq!(store.list_by_owner("a@example.com").await.unwrap().len(), 2);
        assert_eq!(store.list_by_owner("b@example.com").await.unwrap().len(), 1);
        assert!(store.list_by_owner("c@example.com").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let store = InMemoryBoardStore::new();
        let b = board("user@example.com");
        store.insert(&b).await.unwrap();
        assert!(store.delete(b.id).await.unwrap());
        assert!(!store.delete(b.id).await.unwrap());
        assert!(store.load(b.id).await.unwrap().is_none());
    }
}
