//! Task relocation: drag-and-drop moves and status-driven moves.
//!
//! Both paths share one protocol, split into a pure plan step and two
//! apply steps. The plan validates every reference and synthesizes the
//! replacement task record (fresh id, `status` taken from the
//! destination column's name — the only places that field is ever
//! written are here and task insertion). The apply steps are then
//! persisted as two separate aggregate writes, insertion first:
//!
//! 1. insert the replacement into the destination column
//! 2. remove the original from the source column
//!
//! A fault between the two writes leaves the task visible in both
//! columns. Duplication is the chosen failure mode: a user can delete a
//! duplicate, nobody can recover a lost card.

use crate::board::{Board, ColumnId, Task, TaskId};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};

/// Payload for a status-driven relocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusPayload {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
}

/// A validated relocation, ready to apply.
#[derive(Debug, Clone)]
pub struct MovePlan {
    /// Id of the record that will be removed from the source column.
    pub old_id: TaskId,
    /// Replacement record, already carrying its fresh id and the
    /// destination column's name as `status`.
    pub new_task: Task,
    pub source_column: ColumnId,
    pub dest_column: ColumnId,
    /// Insertion index in the destination, already clamped.
    pub dest_index: usize,
}

/// Validate and plan a move/reorder.
///
/// The task must currently sit in `source_column`; if it does not (a
/// racing operation moved or deleted it) the result is `NotFound` and
/// the caller treats the whole operation as a no-op. `dest_index` is
/// clamped into `[0, destination length]`; for a same-column move the
/// length still includes the original record, which is only removed in
/// the second step.
pub fn plan_move(
    board: &Board,
    task_id: TaskId,
    source_column: ColumnId,
    dest_column: ColumnId,
    dest_index: usize,
) -> Result<MovePlan> {
    let source = board
        .find_column(source_column)
        .ok_or_else(|| EngineError::invalid_ref(format!("source column {}", source_column)))?;
    let dest = board
        .find_column(dest_column)
        .ok_or_else(|| EngineError::invalid_ref(format!("destination column {}", dest_column)))?;

    let task = source
        .tasks
        .iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| {
            EngineError::not_found(format!("task {} in column {}", task_id, source_column))
        })?;

    Ok(MovePlan {
        old_id: task_id,
        new_task: Task {
            id: TaskId::new(),
            title: task.title.clone(),
            description: task.description.clone(),
            status: dest.name.clone(),
        },
        source_column,
        dest_column,
        dest_index: dest_index.min(dest.tasks.len()),
    })
}

/// Validate and plan a status change.
///
/// Returns `Ok(None)` when the payload's status equals the task's
/// current status (repeated identical requests are no-ops). The
/// destination is the first column in board order whose name equals the
/// new status; if none exists the plan fails with `InvalidReference`
/// before anything is written, so the task stays put. The replacement
/// record is built from the payload and appended at the end of the
/// destination.
pub fn plan_status_change(
    board: &Board,
    task_id: TaskId,
    source_column: ColumnId,
    payload: &StatusPayload,
) -> Result<Option<MovePlan>> {
    let source = board
        .find_column(source_column)
        .ok_or_else(|| EngineError::invalid_ref(format!("source column {}", source_column)))?;

    let task = source
        .tasks
        .iter()
        .find(|t| t.id == task_id)
        .ok_or_else(|| {
            EngineError::not_found(format!("task {} in column {}", task_id, source_column))
        })?;

    if payload.status == task.status {
        return Ok(None);
    }

    let dest = board.find_column_by_name(&payload.status).ok_or_else(|| {
        EngineError::invalid_ref(format!("no column named {:?}", payload.status))
    })?;

    Ok(Some(MovePlan {
        old_id: task_id,
        new_task: Task {
            id: TaskId::new(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            status: dest.name.clone(),
        },
        source_column,
        dest_column: dest.id,
        dest_index: dest.tasks.len(),
    }))
}

/// Step one: insert the replacement record into the destination.
pub fn apply_insert(board: &mut Board, plan: &MovePlan) {
    if let Some(dest) = board.find_column_mut(plan.dest_column) {
        let index = plan.dest_index.min(dest.tasks.len());
        dest.tasks.insert(index, plan.new_task.clone());
    }
}

/// Step two: remove the original record from the source.
pub fn apply_remove(board: &mut Board, plan: &MovePlan) {
    if let Some(source) = board.find_column_mut(plan.source_column) {
        source.tasks.retain(|t| t.id != plan.old_id);
    }
}
