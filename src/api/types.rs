//! Request/response types shared across API handlers.

use crate::board::{ColumnId, ColumnSpec, TaskId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Identity established by the upstream authentication provider.
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Expiration unix seconds
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateBoardRequest {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

/// Query for task insertion: names the column by its status string,
/// which is how the drag-and-drop client addresses columns.
#[derive(Debug, Deserialize)]
pub struct InsertTaskQuery {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct FindTaskQuery {
    pub column: String,
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub task_id: TaskId,
    pub source_column: ColumnId,
    pub dest_column: ColumnId,
    pub dest_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct ChangeStatusRequest {
    pub task_id: TaskId,
    pub source_column: ColumnId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: String,
}

/// Response for a status change; `moved` is false when the request was
/// an idempotent repeat.
#[derive(Debug, Serialize)]
pub struct ChangeStatusResponse {
    pub moved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_id: Option<TaskId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_id: Option<TaskId>,
}
