//! Board API handlers: a thin mapping from HTTP verbs to engine
//! operations. Ownership is stamped from the authenticated identity on
//! create and matched against it on reads; the engine itself never sees
//! who is calling.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::board::{Board, BoardId, ColumnId, ColumnSpec, Task, TaskDraft, TaskId};
use crate::engine::{MoveResult, StatusOutcome, StatusPayload};
use crate::error::EngineError;

use super::auth::AuthUser;
use super::routes::AppState;
use super::types::*;

type ApiError = (StatusCode, String);

fn engine_error(err: EngineError) -> ApiError {
    let status = match err {
        EngineError::InvalidReference(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

pub async fn create_board(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(owner)): Extension<AuthUser>,
    Json(req): Json<CreateBoardRequest>,
) -> Result<(StatusCode, Json<Board>), ApiError> {
    let board = state
        .engine
        .create_board(&owner, &req.name, req.columns)
        .await
        .map_err(engine_error)?;
    Ok((StatusCode::CREATED, Json(board)))
}

pub async fn list_boards(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(owner)): Extension<AuthUser>,
) -> Result<Json<Vec<Board>>, ApiError> {
    let boards = state
        .engine
        .list_boards(&owner)
        .await
        .map_err(engine_error)?;
    Ok(Json(boards))
}

pub async fn get_board(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(owner)): Extension<AuthUser>,
    Path(id): Path<BoardId>,
) -> Result<Json<Board>, ApiError> {
    let board = state.engine.get_board(id).await.map_err(engine_error)?;
    if board.owner != owner {
        return Err((StatusCode::FORBIDDEN, "Not your board".to_string()));
    }
    Ok(Json(board))
}

pub async fn update_board(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BoardId>,
    Json(req): Json<UpdateBoardRequest>,
) -> Result<Json<Board>, ApiError> {
    let board = state
        .engine
        .update_board(id, &req.name, req.columns)
        .await
        .map_err(engine_error)?;
    Ok(Json(board))
}

pub async fn delete_board(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BoardId>,
) -> Result<StatusCode, ApiError> {
    state.engine.delete_board(id).await.map_err(engine_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_column(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BoardId>,
    Json(spec): Json<ColumnSpec>,
) -> Result<Json<Board>, ApiError> {
    let board = state
        .engine
        .add_column(id, spec)
        .await
        .map_err(engine_error)?;
    Ok(Json(board))
}

pub async fn delete_column(
    State(state): State<Arc<AppState>>,
    Path((id, column_id)): Path<(BoardId, ColumnId)>,
) -> Result<Json<Board>, ApiError> {
    let board = state
        .engine
        .delete_column(id, column_id)
        .await
        .map_err(engine_error)?;
    Ok(Json(board))
}

pub async fn insert_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BoardId>,
    Query(query): Query<InsertTaskQuery>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state
        .engine
        .insert_task(id, &query.status, draft)
        .await
        .map_err(engine_error)?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn find_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BoardId>,
    Query(query): Query<FindTaskQuery>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .engine
        .find_task_by_title(id, &query.column, &query.title)
        .await
        .map_err(engine_error)?;
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path((id, column_id, task_id)): Path<(BoardId, ColumnId, TaskId)>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<Task>, ApiError> {
    let task = state
        .engine
        .update_task(id, column_id, task_id, draft)
        .await
        .map_err(engine_error)?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path((id, column_id, task_id)): Path<(BoardId, ColumnId, TaskId)>,
) -> Result<StatusCode, ApiError> {
    state
        .engine
        .delete_task(id, column_id, task_id)
        .await
        .map_err(engine_error)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn move_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BoardId>,
    Json(req): Json<MoveTaskRequest>,
) -> Result<Json<MoveResult>, ApiError> {
    let result = state
        .engine
        .move_task(
            id,
            req.task_id,
            req.source_column,
            req.dest_column,
            req.dest_index,
        )
        .await
        .map_err(engine_error)?;
    Ok(Json(result))
}

pub async fn change_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<BoardId>,
    Json(req): Json<ChangeStatusRequest>,
) -> Result<Json<ChangeStatusResponse>, ApiError> {
    let payload = StatusPayload {
        title: req.title,
        description: req.description,
        status: req.status,
    };
    let outcome = state
        .engine
        .change_status(id, req.task_id, req.source_column, payload)
        .await
        .map_err(engine_error)?;
    let response = match outcome {
        StatusOutcome::Unchanged => ChangeStatusResponse {
            moved: false,
            old_id: None,
            new_id: None,
        },
        StatusOutcome::Moved(result) => ChangeStatusResponse {
            moved: true,
            old_id: Some(result.old_id),
            new_id: Some(result.new_id),
        },
    };
    Ok(Json(response))
}
