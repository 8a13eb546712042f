use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Waiting room lifecycle
        .route(
            "/rooms/:session_id",
            post(handlers::mount_room)
                .get(handlers::get_room)
                .delete(handlers::unmount_room),
        )
        .route("/rooms/:session_id/start", post(handlers::start_room))
        .route("/rooms/:session_id/back", post(handlers::back_room))
        // Navigation requested by rooms
        .route("/navigation", get(handlers::navigation_history))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
