//! # DigitalBucket
//!
//! Kanban board service: each user owns a set of boards, a board is an
//! ordered list of columns, and a column is an ordered list of tasks.
//! The interesting part is mutation — column reconciliation, task moves
//! between and within columns, and status-driven relocation — applied
//! to the nested aggregate without ever corrupting it under partial
//! failure or concurrent access.
//!
//! ## Architecture
//!
//! ```text
//!   HTTP (api) ──▶ BoardEngine (engine) ──▶ BoardStore (store)
//!                       │
//!                per-board locks,
//!                pure transforms,
//!                optimistic replace
//! ```
//!
//! Every mutation is a lock → load → transform → replace sequence on a
//! whole board aggregate. Task relocation persists as two writes with
//! insertion first, so a fault in between duplicates the task instead
//! of losing it.
//!
//! ## Modules
//! - `board`: the aggregate model and task locator
//! - `engine`: all mutation operations and the concurrency guard
//! - `store`: pluggable aggregate storage (memory, SQLite)
//! - `api`: thin HTTP request layer (axum + JWT)

pub mod api;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod store;

pub use board::{Board, BoardId, Column, ColumnSpec, Task, TaskDraft, TaskId};
pub use config::Config;
pub use engine::{BoardEngine, MoveResult, StatusOutcome, StatusPayload};
pub use error::EngineError;
