//! SQLite-backed board store.
//!
//! One row per board aggregate: the nested document is serialized as
//! JSON, and a `version` column backs the optimistic `replace`. The
//! conditional `UPDATE ... WHERE id = ? AND version = ?` is the whole
//! concurrency story at this layer.

use super::{BoardStore, StoreError};
use crate::board::{Board, BoardId};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS boards (
    id TEXT PRIMARY KEY NOT NULL,
    owner TEXT NOT NULL,
    version INTEGER NOT NULL DEFAULT 1,
    document TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_boards_owner ON boards(owner);
"#;

pub struct SqliteBoardStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBoardStore {
    pub async fn new(base_dir: PathBuf) -> Result<Self, StoreError> {
        let db_path = base_dir.join("boards.db");

        tokio::fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to create store dir: {}", e)))?;

        // Open database in blocking task
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)
                .map_err(|e| StoreError::Backend(format!("failed to open database: {}", e)))?;
            conn.execute_batch(SCHEMA)
                .map_err(|e| StoreError::Backend(format!("failed to run schema: {}", e)))?;
            Ok::<_, StoreError>(conn)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("task join error: {}", e)))??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn encode(board: &Board) -> Result<String, StoreError> {
        serde_json::to_string(board)
            .map_err(|e| StoreError::Backend(format!("failed to serialize board: {}", e)))
    }

    fn decode(document: &str) -> Result<Board, StoreError> {
        serde_json::from_str(document)
            .map_err(|e| StoreError::Backend(format!("failed to parse stored board: {}", e)))
    }
}

#[async_trait]
impl BoardStore for SqliteBoardStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn insert(&self, board: &Board) -> Result<(), StoreError> {
        let conn = self.conn.clone();
        let document = Self::encode(board)?;
        let id = board.id.to_string();
        let owner = board.owner.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let now = Utc::now().to_rfc3339();
            let result = conn.execute(
                "INSERT INTO boards (id, owner, version, document, created_at, updated_at)
                 VALUES (?1, ?2, 1, ?3, ?4, ?4)",
                params![id, owner, document, now],
            );
            match result {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::AlreadyExists)
                }
                Err(e) => Err(StoreError::Backend(format!("insert failed: {}", e))),
            }
        })
        .await
        .map_err(|e| StoreError::Backend(format!("task join error: {}", e)))?
    }

    async fn load(&self, id: BoardId) -> Result<Option<(Board, u64)>, StoreError> {
        let conn = self.conn.clone();
        let id = id.to_string();
        let row = tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.query_row(
                "SELECT document, version FROM boards WHERE id = ?1",
                params![id],
                |row| {
                    let document: String = row.get(0)?;
                    let version: i64 = row.get(1)?;
                    Ok((document, version))
                },
            )
            .optional()
            .map_err(|e| StoreError::Backend(format!("load failed: {}", e)))
        })
        .await
        .map_err(|e| StoreError::Backend(format!("task join error: {}", e)))??;

        match row {
            Some((document, version)) => Ok(Some((Self::decode(&document)?, version as u64))),
            None => Ok(None),
        }
    }

    async fn replace(
        &self,
        id: BoardId,
        board: &Board,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let conn = self.conn.clone();
        let document = Self::encode(board)?;
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let now = Utc::now().to_rfc3339();
            let changed = conn
                .execute(
                    "UPDATE boards SET document = ?1, version = version + 1, updated_at = ?2
                     WHERE id = ?3 AND version = ?4",
                    params![document, now, id, expected_version as i64],
                )
                .map_err(|e| StoreError::Backend(format!("replace failed: {}", e)))?;
            if changed == 0 {
                // Either the row is gone or another writer bumped the
                // version; both mean the caller's snapshot is stale.
                return Err(StoreError::Conflict);
            }
            Ok(expected_version + 1)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("task join error: {}", e)))?
    }

    async fn delete(&self, id: BoardId) -> Result<bool, StoreError> {
        let conn = self.conn.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let changed = conn
                .execute("DELETE FROM boards WHERE id = ?1", params![id])
                .map_err(|e| StoreError::Backend(format!("delete failed: {}", e)))?;
            Ok(changed > 0)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("task join error: {}", e)))?
    }

    async fn list_by_owner(&self, owner: &str) -> Result<Vec<Board>, StoreError> {
        let conn = self.conn.clone();
        let owner = owner.to_string();
        let documents = tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let mut stmt = conn
                .prepare(
                    "SELECT document FROM boards WHERE owner = ?1 ORDER BY updated_at DESC",
                )
                .map_err(|e| StoreError::Backend(format!("list failed: {}", e)))?;
            let rows = stmt
                .query_map(params![owner], |row| row.get::<_, String>(0))
                .map_err(|e| StoreError::Backend(format!("list failed: {}", e)))?;
            let mut documents = Vec::new();
            for row in rows {
                documents
                    .push(row.map_err(|e| StoreError::Backend(format!("list failed: {}", e)))?);
            }
            Ok::<_, StoreError>(documents)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("task join error: {}", e)))??;

        documents.iter().map(|d| Self::decode(d)).collect()
    }
}
