//! Board aggregate: the nested Board → Column → Task document.
//!
//! A board is owned by exactly one user identity and is loaded, mutated,
//! and persisted as a single unit of consistency. Column order and task
//! order inside a column are authoritative display order.
//!
//! Identifier conventions:
//! - Board and task ids are opaque globally-unique tokens ([`BoardId`],
//!   [`TaskId`], UUIDv4 under the hood).
//! - Column ids are small integers unique within one board, chosen by
//!   the client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column identifier, unique within a single board.
pub type ColumnId = i64;

/// Globally-unique board identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(Uuid);

impl BoardId {
    /// Allocate a fresh board id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BoardId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BoardId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Globally-unique task identifier.
///
/// Note that a task does NOT keep its id across relocations: the move
/// engine synthesizes a fresh record (and id) on every move, and returns
/// both ids so callers can reconcile references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Allocate a fresh task id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A single task card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Denormalized copy of the containing column's name. Written only
    /// by task insertion and the relocation paths, never edited
    /// directly.
    pub status: String,
}

/// An ordered column of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    /// Create an empty column.
    pub fn new(id: ColumnId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tasks: Vec::new(),
        }
    }
}

/// Client-supplied desired column entry for board edits (no task
/// payload; task lists are owned by the stored aggregate).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub name: String,
}

/// Payload for creating or editing a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// The full board aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    /// Authenticated identity of the board's owner.
    pub owner: String,
    pub name: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Board {
    pub fn find_column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn find_column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    /// First column whose name matches, in column order. Column names
    /// are kept unique by the mutation paths, so for well-formed boards
    /// "first" is "the" match; for pre-existing duplicates this is the
    /// documented tie-break.
    pub fn find_column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn find_column_by_name_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Locate a task by id: linear scan across columns then tasks,
    /// first match wins.
    pub fn find_task(&self, id: TaskId) -> Option<(&Column, &Task)> {
        for column in &self.columns {
            if let Some(task) = column.tasks.iter().find(|t| t.id == id) {
                return Some((column, task));
            }
        }
        None
    }

    /// Locate a task by title within the named column. Titles are not
    /// required to be unique; duplicates resolve to the first in task
    /// order (a deliberately loose contract).
    pub fn find_task_by_title(&self, column_name: &str, title: &str) -> Option<&Task> {
        self.find_column_by_name(column_name)?
            .tasks
            .iter()
            .find(|t| t.title == title)
    }

    /// Total number of tasks across all columns.
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }

    /// Verify the structural invariants of the aggregate: column ids
    /// unique, task ids unique board-wide, and every task's `status`
    /// equal to its containing column's name.
    ///
    /// Exercised by tests after every mutating operation; not called on
    /// hot paths.
    pub fn check_consistency(&self) -> Result<(), String> {
        let mut column_ids = std::collections::HashSet::new();
        let mut task_ids = std::collections::HashSet::new();
        for column in &self.columns {
            if !column_ids.insert(column.id) {
                return Err(format!("duplicate column id {}", column.id));
            }
            for task in &column.tasks {
                if !task_ids.insert(task.id) {
                    return Err(format!("duplicate task id {}", task.id));
                }
                if task.status != column.name {
                    return Err(format!(
                        "task {} has status {:?} but sits in column {:?}",
                        task.id, task.status, column.name
                    ));
                }
            }
        }
        Ok(())
    }
}
