//! HTTP route wiring.

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::engine::BoardEngine;
use crate::store::create_board_store;

use super::auth;
use super::boards;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub engine: BoardEngine,
}

async fn health() -> &'static str {
    "DigitalBucket server is running"
}

/// Build the router for the given state.
pub fn router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/login", post(auth::login));

    let protected_routes = Router::new()
        .route(
            "/api/boards",
            post(boards::create_board).get(boards::list_boards),
        )
        .route(
            "/api/boards/:id",
            get(boards::get_board)
                .put(boards::update_board)
                .delete(boards::delete_board),
        )
        .route("/api/boards/:id/columns", post(boards::add_column))
        .route(
            "/api/boards/:id/columns/:column_id",
            delete(boards::delete_column),
        )
        .route("/api/boards/:id/tasks", post(boards::insert_task))
        .route("/api/boards/:id/tasks/find", get(boards::find_task))
        .route(
            "/api/boards/:id/columns/:column_id/tasks/:task_id",
            put(boards::update_task).delete(boards::delete_task),
        )
        .route("/api/boards/:id/move", post(boards::move_task))
        .route("/api/boards/:id/status", post(boards::change_status))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_auth,
        ));

    public_routes
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = create_board_store(config.store_type, config.data_dir.clone()).await?;
    let engine = BoardEngine::new(Arc::from(store), config.store_timeout);

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState { config, engine });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
