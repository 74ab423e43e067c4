//! In-memory board store (non-persistent).

use super::{BoardStore, StoreError};
use crate::board::{Board, BoardId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryBoardStore {
    boards: Arc<RwLock<HashMap<BoardId, (Board, u64)>>>,
}

impl InMemoryBoardStore {
    pub fn new() -> Self {
        Self {
            boards: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryBoardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BoardStore for InMemoryBoardStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn insert(&self, board: &Board) -> Result<(), StoreError> {
        let mut boards = self.boards.write().await;
        if boards.contains_key(&board.id) {
            return Err(StoreError::AlreadyExists);
        }
        boards.insert(board.id, (board.clone(), 1));
        Ok(())
    }

    async fn load(&self, id: BoardId) -> Result<Option<(Board, u64)>, StoreError> {
        Ok(self.boards.read().await.get(&id).cloned())
    }

    async fn replace(
        &self,
        id: BoardId,
        board: &Board,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let mut boards = self.boards.write().await;
        let entry = boards
            .get_mut(&id)
            .ok_or_else(|| StoreError::Backend(format!("board {} not stored", id)))?;
        if entry.1 != expected_version {
            return Err(StoreError::Conflict);
        }
        entry.0 = board.clone();
        entry.1 += 1;
        Ok(entry.1)
    }

    async fn delete(&self, id: BoardId) -> Result<bool, StoreError> {
        Ok(self.boards.write().await.remove(&id).is_some())
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Board>, StoreError> {
        Ok(self
            .boards
            .read()
            .await
            .values()
            .filter(|(b, _)| b.owner == owner)
            .map(|(b, _)| b.clone())
            .collect())
    }
}
