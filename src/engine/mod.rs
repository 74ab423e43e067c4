//! Board mutation engine.
//!
//! Every public operation follows the same discipline: acquire the
//! per-board exclusive section, load the aggregate, apply a pure
//! transform, and replace the aggregate under an optimistic version
//! check. Task moves and status changes persist their two steps as two
//! separate writes (insert first), so a fault in between duplicates the
//! task instead of losing it.
//!
//! The engine never retries internally and never makes authorization
//! decisions; conflicts and reference errors surface verbatim to the
//! caller.

pub mod locks;
pub mod reconcile;
pub mod relocate;

pub use relocate::StatusPayload;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::board::{Board, BoardId, Column, ColumnId, ColumnSpec, Task, TaskDraft, TaskId};
use crate::error::{EngineError, Result};
use crate::store::{BoardStore, StoreError};
use locks::BoardLocks;

/// Outcome of a relocation: the record in the destination column is a
/// fresh one, so both ids are returned for callers holding references.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MoveResult {
    pub old_id: TaskId,
    pub new_id: TaskId,
    pub board: Board,
}

/// Outcome of a status change request.
#[derive(Debug, Clone)]
pub enum StatusOutcome {
    /// The payload's status already matched; nothing was written.
    Unchanged,
    Moved(MoveResult),
}

pub struct BoardEngine {
    store: Arc<dyn BoardStore>,
    locks: BoardLocks,
    /// Bounded deadline for individual store calls.
    store_timeout: Duration,
}

impl BoardEngine {
    pub fn new(store: Arc<dyn BoardStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            locks: BoardLocks::new(),
            store_timeout,
        }
    }

    // ─── store access with bounded deadlines ────────────────────────

    async fn store_load(&self, id: BoardId) -> Result<Option<(Board, u64)>> {
        timeout(self.store_timeout, self.store.load(id))
            .await
            .map_err(|_| EngineError::Storage(format!("load of board {} timed out", id)))?
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    /// A timed-out replace is reported as a conflict, not a failure:
    /// the underlying write may have landed, so the only safe move for
    /// the caller is a retry from a fresh load.
    async fn store_replace(&self, id: BoardId, board: &Board, version: u64) -> Result<u64> {
        match timeout(self.store_timeout, self.store.replace(id, board, version)).await {
            Err(_) => {
                warn!(board = %id, "replace timed out, reporting conflict");
                Err(EngineError::Conflict(id))
            }
            Ok(Err(StoreError::Conflict)) => {
                warn!(board = %id, "optimistic replace conflict");
                Err(EngineError::Conflict(id))
            }
            Ok(Err(e)) => Err(EngineError::Storage(e.to_string())),
            Ok(Ok(new_version)) => Ok(new_version),
        }
    }

    /// Load for a mutation: the board id is the referent of the edit,
    /// so an unresolvable id is an invalid reference.
    async fn load_for_update(&self, id: BoardId) -> Result<(Board, u64)> {
        self.store_load(id)
            .await?
            .ok_or_else(|| EngineError::invalid_ref(format!("board {}", id)))
    }

    /// Load for a read: an absent aggregate is plain not-found.
    async fn load_for_read(&self, id: BoardId) -> Result<Board> {
        Ok(self
            .store_load(id)
            .await?
            .ok_or_else(|| EngineError::not_found(format!("board {}", id)))?
            .0)
    }

    // ─── board lifecycle ────────────────────────────────────────────

    /// Create a board owned by `owner` with the given (empty) columns.
    pub async fn create_board(
        &self,
        owner: &str,
        name: &str,
        columns: Vec<ColumnSpec>,
    ) -> Result<Board> {
        reconcile::validate_column_specs(&columns)?;
        let board = Board {
            id: BoardId::new(),
            owner: owner.to_string(),
            name: name.to_string(),
            columns: columns
                .into_iter()
                .map(|spec| Column::new(spec.id, spec.name))
                .collect(),
        };
        match timeout(self.store_timeout, self.store.insert(&board)).await {
            Err(_) => return Err(EngineError::Storage("board insert timed out".to_string())),
            Ok(Err(e)) => return Err(EngineError::Storage(e.to_string())),
            Ok(Ok(())) => {}
        }
        info!(board = %board.id, owner = %owner, "created board");
        Ok(board)
    }

    pub async fn get_board(&self, id: BoardId) -> Result<Board> {
        self.load_for_read(id).await
    }

    pub async fn list_boards(&self, owner: &str) -> Result<Vec<Board>> {
        timeout(self.store_timeout, self.store.list_by_owner(owner))
            .await
            .map_err(|_| EngineError::Storage("board listing timed out".to_string()))?
            .map_err(|e| EngineError::Storage(e.to_string()))
    }

    /// Delete a board and everything in it.
    pub async fn delete_board(&self, id: BoardId) -> Result<()> {
        let _guard = self.locks.acquire(id).await;
        let removed = timeout(self.store_timeout, self.store.delete(id))
            .await
            .map_err(|_| EngineError::Storage("board delete timed out".to_string()))?
            .map_err(|e| EngineError::Storage(e.to_string()))?;
        if !removed {
            return Err(EngineError::not_found(format!("board {}", id)));
        }
        info!(board = %id, "deleted board");
        Ok(())
    }

    /// Board edit: rename and reconcile the column list (supplied by
    /// the client as the full desired list, in display order).
    pub async fn update_board(
        &self,
        id: BoardId,
        name: &str,
        desired: Vec<ColumnSpec>,
    ) -> Result<Board> {
        let _guard = self.locks.acquire(id).await;
        let (mut board, version) = self.load_for_update(id).await?;
        board.name = name.to_string();
        board.columns = reconcile::reconcile_columns(std::mem::take(&mut board.columns), &desired)?;
        self.store_replace(id, &board, version).await?;
        info!(board = %id, columns = board.columns.len(), "reconciled board");
        Ok(board)
    }

    // ─── columns ────────────────────────────────────────────────────

    /// Append one column. Ids and names must stay unique on the board.
    pub async fn add_column(&self, id: BoardId, spec: ColumnSpec) -> Result<Board> {
        let _guard = self.locks.acquire(id).await;
        let (mut board, version) = self.load_for_update(id).await?;
        if board.find_column(spec.id).is_some() {
            return Err(EngineError::invalid_ref(format!(
                "column id {} already exists",
                spec.id
            )));
        }
        if board.find_column_by_name(&spec.name).is_some() {
            return Err(EngineError::invalid_ref(format!(
                "column name {:?} already exists",
                spec.name
            )));
        }
        board.columns.push(Column::new(spec.id, spec.name));
        self.store_replace(id, &board, version).await?;
        Ok(board)
    }

    /// Remove a column together with its tasks.
    pub async fn delete_column(&self, id: BoardId, column_id: ColumnId) -> Result<Board> {
        let _guard = self.locks.acquire(id).await;
        let (mut board, version) = self.load_for_update(id).await?;
        let before = board.columns.len();
        board.columns.retain(|c| c.id != column_id);
        if board.columns.len() == before {
            return Err(EngineError::invalid_ref(format!("column {}", column_id)));
        }
        self.store_replace(id, &board, version).await?;
        info!(board = %id, column = column_id, "deleted column");
        Ok(board)
    }

    // ─── tasks ──────────────────────────────────────────────────────

    /// Insert a new task at the end of the column whose name equals
    /// `status`. The stored status field is written from the column
    /// name, not from the caller.
    pub async fn insert_task(&self, id: BoardId, status: &str, draft: TaskDraft) -> Result<Task> {
        let _guard = self.locks.acquire(id).await;
        let (mut board, version) = self.load_for_update(id).await?;
        let column = board
            .find_column_by_name_mut(status)
            .ok_or_else(|| EngineError::invalid_ref(format!("no column named {:?}", status)))?;
        let task = Task {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            status: column.name.clone(),
        };
        column.tasks.push(task.clone());
        self.store_replace(id, &board, version).await?;
        debug!(board = %id, task = %task.id, "inserted task");
        Ok(task)
    }

    /// Edit a task's title and description in place. `status` is not
    /// editable here; relocations own that field.
    pub async fn update_task(
        &self,
        id: BoardId,
        column_id: ColumnId,
        task_id: TaskId,
        draft: TaskDraft,
    ) -> Result<Task> {
        let _guard = self.locks.acquire(id).await;
        let (mut board, version) = self.load_for_update(id).await?;
        let column = board
            .find_column_mut(column_id)
            .ok_or_else(|| EngineError::invalid_ref(format!("column {}", column_id)))?;
        let task = column
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| EngineError::not_found(format!("task {}", task_id)))?;
        task.title = draft.title;
        task.description = draft.description;
        let task = task.clone();
        self.store_replace(id, &board, version).await?;
        Ok(task)
    }

    pub async fn delete_task(&self, id: BoardId, column_id: ColumnId, task_id: TaskId) -> Result<()> {
        let _guard = self.locks.acquire(id).await;
        let (mut board, version) = self.load_for_update(id).await?;
        let column = board
            .find_column_mut(column_id)
            .ok_or_else(|| EngineError::invalid_ref(format!("column {}", column_id)))?;
        let before = column.tasks.len();
        column.tasks.retain(|t| t.id != task_id);
        if column.tasks.len() == before {
            return Err(EngineError::not_found(format!("task {}", task_id)));
        }
        self.store_replace(id, &board, version).await?;
        debug!(board = %id, task = %task_id, "deleted task");
        Ok(())
    }

    // ─── relocation ─────────────────────────────────────────────────

    /// Move a task to a new column and/or position.
    ///
    /// The relocated record gets a fresh id; both ids come back in the
    /// [`MoveResult`]. The insertion write happens before the removal
    /// write, so a fault in between leaves the task duplicated rather
    /// than lost.
    pub async fn move_task(
        &self,
        id: BoardId,
        task_id: TaskId,
        source_column: ColumnId,
        dest_column: ColumnId,
        dest_index: usize,
    ) -> Result<MoveResult> {
        let _guard = self.locks.acquire(id).await;
        let (mut board, version) = self.load_for_update(id).await?;
        let plan = relocate::plan_move(&board, task_id, source_column, dest_column, dest_index)?;

        relocate::apply_insert(&mut board, &plan);
        let version = self.store_replace(id, &board, version).await?;

        relocate::apply_remove(&mut board, &plan);
        self.store_replace(id, &board, version).await?;

        info!(
            board = %id,
            old = %plan.old_id,
            new = %plan.new_task.id,
            from = source_column,
            to = dest_column,
            "moved task"
        );
        Ok(MoveResult {
            old_id: plan.old_id,
            new_id: plan.new_task.id,
            board,
        })
    }

    /// Relocate a task to the column matching its new status.
    ///
    /// No-op when the status is unchanged. Uses the same two-write
    /// insert-then-remove protocol as [`move_task`](Self::move_task);
    /// when no column carries the new status the operation fails with
    /// `InvalidReference` before anything is written.
    pub async fn change_status(
        &self,
        id: BoardId,
        task_id: TaskId,
        source_column: ColumnId,
        payload: StatusPayload,
    ) -> Result<StatusOutcome> {
        let _guard = self.locks.acquire(id).await;
        let (mut board, version) = self.load_for_update(id).await?;
        let plan = match relocate::plan_status_change(&board, task_id, source_column, &payload)? {
            Some(plan) => plan,
            None => {
                debug!(board = %id, task = %task_id, "status unchanged, no-op");
                return Ok(StatusOutcome::Unchanged);
            }
        };

        relocate::apply_insert(&mut board, &plan);
        let version = self.store_replace(id, &board, version).await?;

        relocate::apply_remove(&mut board, &plan);
        self.store_replace(id, &board, version).await?;

        info!(
            board = %id,
            old = %plan.old_id,
            new = %plan.new_task.id,
            status = %payload.status,
            "relocated task on status change"
        );
        Ok(StatusOutcome::Moved(MoveResult {
            old_id: plan.old_id,
            new_id: plan.new_task.id,
            board,
        }))
    }

    // ─── lookups ────────────────────────────────────────────────────

    pub async fn find_task(&self, id: BoardId, task_id: TaskId) -> Result<(Column, Task)> {
        let board = self.load_for_read(id).await?;
        board
            .find_task(task_id)
            .map(|(c, t)| (c.clone(), t.clone()))
            .ok_or_else(|| EngineError::not_found(format!("task {}", task_id)))
    }

    pub async fn find_task_by_title(
        &self,
        id: BoardId,
        column_name: &str,
        title: &str,
    ) -> Result<Task> {
        let board = self.load_for_read(id).await?;
        board
            .find_task_by_title(column_name, title)
            .cloned()
            .ok_or_else(|| {
                EngineError::not_found(format!("task titled {:?} in {:?}", title, column_name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryBoardStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn spec(id: i64, name: &str) -> ColumnSpec {
        ColumnSpec {
            id,
            name: name.to_string(),
        }
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: format!("{} description", title),
        }
    }

    fn engine() -> BoardEngine {
        BoardEngine::new(Arc::new(InMemoryBoardStore::new()), TIMEOUT)
    }

    async fn todo_done_board(engine: &BoardEngine) -> Board {
        engine
            .create_board(
                "user@example.com",
                "Sprint",
                vec![spec(1, "Todo"), spec(2, "Done")],
            )
            .await
            .unwrap()
    }

    /// Store wrapper that fails the Nth replace call, for exercising
    /// the two-write move protocol's intermediate state.
    struct FailNthReplace {
        inner: InMemoryBoardStore,
        fail_at: usize,
        calls: AtomicUsize,
    }

    impl FailNthReplace {
        fn new(inner: InMemoryBoardStore, fail_at: usize) -> Self {
            Self {
                inner,
                fail_at,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BoardStore for FailNthReplace {
        fn is_persistent(&self) -> bool {
            false
        }

        async fn insert(&self, board: &Board) -> std::result::Result<(), StoreError> {
            self.inner.insert(board).await
        }

        async fn load(&self, id: BoardId) -> std::result::Result<Option<(Board, u64)>, StoreError> {
            self.inner.load(id).await
        }

        async fn replace(
            &self,
            id: BoardId,
            board: &Board,
            expected_version: u64,
        ) -> std::result::Result<u64, StoreError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.fail_at {
                return Err(StoreError::Backend("injected fault".to_string()));
            }
            self.inner.replace(id, board, expected_version).await
        }

        async fn delete(&self, id: BoardId) -> std::result::Result<bool, StoreError> {
            self.inner.delete(id).await
        }

        async fn list_by_owner(&self, owner: &str) -> std::result::Result<Vec<Board>, StoreError> {
            self.inner.list_by_owner(owner).await
        }
    }

    #[tokio::test]
    async fn test_insert_then_move_scenario() {
        let engine = engine();
        let board = todo_done_board(&engine).await;

        let task = engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();
        assert_eq!(task.status, "Todo");

        let current = engine.get_board(board.id).await.unwrap();
        assert_eq!(current.columns[0].tasks.len(), 1);
        assert!(current.check_consistency().is_ok());

        let moved = engine.move_task(board.id, task.id, 1, 2, 0).await.unwrap();
        assert_eq!(moved.old_id, task.id);
        assert_ne!(moved.new_id, task.id);

        let current = engine.get_board(board.id).await.unwrap();
        assert!(current.columns[0].tasks.is_empty());
        assert_eq!(current.columns[1].tasks.len(), 1);
        assert_eq!(current.columns[1].tasks[0].title, "A");
        assert_eq!(current.columns[1].tasks[0].status, "Done");
        assert_eq!(current.columns[1].tasks[0].id, moved.new_id);
        assert!(current.check_consistency().is_ok());
    }

    #[tokio::test]
    async fn test_move_preserves_total_task_count() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        for title in ["A", "B", "C"] {
            engine
                .insert_task(board.id, "Todo", draft(title))
                .await
                .unwrap();
        }
        let b = engine
            .find_task_by_title(board.id, "Todo", "B")
            .await
            .unwrap();

        engine.move_task(board.id, b.id, 1, 2, 0).await.unwrap();

        let current = engine.get_board(board.id).await.unwrap();
        assert_eq!(current.task_count(), 3);
        assert!(current.check_consistency().is_ok());
    }

    #[tokio::test]
    async fn test_same_column_reorder_synthesizes_fresh_record() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        for title in ["A", "B", "C"] {
            engine
                .insert_task(board.id, "Todo", draft(title))
                .await
                .unwrap();
        }
        let c = engine
            .find_task_by_title(board.id, "Todo", "C")
            .await
            .unwrap();

        let moved = engine.move_task(board.id, c.id, 1, 1, 0).await.unwrap();
        assert_ne!(moved.new_id, c.id);

        let current = engine.get_board(board.id).await.unwrap();
        let titles: Vec<&str> = current.columns[0]
            .tasks
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
        assert_eq!(current.task_count(), 3);
        assert!(current.check_consistency().is_ok());
    }

    #[tokio::test]
    async fn test_fault_between_insert_and_remove_duplicates_never_loses() {
        let store = FailNthReplace::new(InMemoryBoardStore::new(), 3);
        // Call 1: insert_task's replace. Call 2: the move's insertion
        // write. Call 3 (failed): the move's removal write.
        let engine = BoardEngine::new(Arc::new(store), TIMEOUT);
        let board = todo_done_board(&engine).await;
        let task = engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();

        let err = engine
            .move_task(board.id, task.id, 1, 2, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Storage(_)));

        // The stored aggregate holds the duplicated intermediate state:
        // one extra record, the original still in place.
        let current = engine.get_board(board.id).await.unwrap();
        assert_eq!(current.task_count(), 2);
        assert_eq!(current.columns[0].tasks.len(), 1);
        assert_eq!(current.columns[0].tasks[0].id, task.id);
        assert_eq!(current.columns[1].tasks.len(), 1);
        assert_eq!(current.columns[1].tasks[0].title, "A");
        assert_eq!(current.columns[1].tasks[0].status, "Done");
        // Both copies still satisfy the status invariant.
        assert!(current.check_consistency().is_ok());
    }

    #[tokio::test]
    async fn test_move_of_vanished_task_is_reported_not_found() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();
        let before = engine.get_board(board.id).await.unwrap();

        let err = engine
            .move_task(board.id, TaskId::new(), 1, 2, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        let after = engine.get_board(board.id).await.unwrap();
        assert_eq!(after.task_count(), before.task_count());
    }

    #[tokio::test]
    async fn test_change_status_relocates_and_is_idempotent() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        let task = engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();

        let payload = StatusPayload {
            title: "A".to_string(),
            description: "A description".to_string(),
            status: "Done".to_string(),
        };
        let outcome = engine
            .change_status(board.id, task.id, 1, payload.clone())
            .await
            .unwrap();
        let moved = match outcome {
            StatusOutcome::Moved(m) => m,
            StatusOutcome::Unchanged => panic!("first call must relocate"),
        };

        let current = engine.get_board(board.id).await.unwrap();
        assert!(current.columns[0].tasks.is_empty());
        assert_eq!(current.columns[1].tasks[0].status, "Done");
        assert!(current.check_consistency().is_ok());

        // Same payload against the already-relocated task: no mutation.
        let again = engine
            .change_status(board.id, moved.new_id, 2, payload)
            .await
            .unwrap();
        assert!(matches!(again, StatusOutcome::Unchanged));
        let after = engine.get_board(board.id).await.unwrap();
        assert_eq!(after.columns[1].tasks[0].id, moved.new_id);
    }

    #[tokio::test]
    async fn test_change_status_unknown_column_leaves_state_untouched() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        let task = engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();

        let err = engine
            .change_status(
                board.id,
                task.id,
                1,
                StatusPayload {
                    title: "A".to_string(),
                    description: String::new(),
                    status: "Archive".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference(_)));

        let current = engine.get_board(board.id).await.unwrap();
        assert_eq!(current.columns[0].tasks.len(), 1);
        assert_eq!(current.columns[0].tasks[0].id, task.id);
        assert_eq!(current.columns[0].tasks[0].status, "Todo");
    }

    #[tokio::test]
    async fn test_update_board_reconciles_columns() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        engine
            .insert_task(board.id, "Todo", draft("T"))
            .await
            .unwrap();

        let updated = engine
            .update_board(board.id, "Sprint 2", vec![spec(1, "Doing"), spec(3, "New")])
            .await
            .unwrap();

        assert_eq!(updated.name, "Sprint 2");
        let ids: Vec<i64> = updated.columns.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(updated.columns[0].name, "Doing");
        assert_eq!(updated.columns[0].tasks.len(), 1);
        assert!(updated.columns[1].tasks.is_empty());
    }

    #[tokio::test]
    async fn test_update_board_on_missing_board_is_invalid_reference() {
        let engine = engine();
        let err = engine
            .update_board(BoardId::new(), "X", vec![spec(1, "Todo")])
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_add_column_rejects_duplicates() {
        let engine = engine();
        let board = todo_done_board(&engine).await;

        let err = engine
            .add_column(board.id, spec(1, "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference(_)));

        let err = engine
            .add_column(board.id, spec(3, "Todo"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference(_)));

        let updated = engine.add_column(board.id, spec(3, "Later")).await.unwrap();
        assert_eq!(updated.columns.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_column_drops_its_tasks() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();

        let updated = engine.delete_column(board.id, 1).await.unwrap();
        assert_eq!(updated.columns.len(), 1);
        assert_eq!(updated.task_count(), 0);

        let err = engine.delete_column(board.id, 1).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_update_task_edits_content_but_not_status() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        let task = engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();

        let updated = engine
            .update_task(board.id, 1, task.id, draft("A, revised"))
            .await
            .unwrap();
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.title, "A, revised");
        assert_eq!(updated.status, "Todo");

        let current = engine.get_board(board.id).await.unwrap();
        assert!(current.check_consistency().is_ok());
    }

    #[tokio::test]
    async fn test_delete_task_and_lookup_errors() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        let task = engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();

        engine.delete_task(board.id, 1, task.id).await.unwrap();
        let err = engine.delete_task(board.id, 1, task.id).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        let err = engine.find_task(board.id, task.id).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));

        let err = engine.get_board(BoardId::new()).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_insert_task_requires_matching_column_name() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        let err = engine
            .insert_task(board.id, "Archive", draft("A"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_create_board_rejects_duplicate_column_names() {
        let engine = engine();
        let err = engine
            .create_board(
                "user@example.com",
                "Sprint",
                vec![spec(1, "Todo"), spec(2, "Todo")],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn test_move_clamps_destination_index() {
        let engine = engine();
        let board = todo_done_board(&engine).await;
        let a = engine
            .insert_task(board.id, "Todo", draft("A"))
            .await
            .unwrap();
        engine
            .insert_task(board.id, "Done", draft("B"))
            .await
            .unwrap();

        engine.move_task(board.id, a.id, 1, 2, 999).await.unwrap();

        let current = engine.get_board(board.id).await.unwrap();
        let titles: Vec<&str> = current.columns[1]
            .tasks
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["B", "A"]);
    }
}
