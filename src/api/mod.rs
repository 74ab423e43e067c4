//! HTTP API: the thin request layer over the board mutation engine.
//!
//! Handlers authenticate the caller (bearer token) and translate verbs
//! into engine operations; all structural logic lives in
//! [`crate::engine`].

pub mod auth;
pub mod boards;
pub mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
