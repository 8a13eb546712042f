use super::state::AppState;
use crate::launch::{NavigationEntry, Navigator};
use crate::room::WaitingRoom;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct LeaveResponse {
    pub session_id: String,
    pub status: String,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn not_found(session_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Waiting room {} not found", session_id),
        }),
    )
        .into_response()
}

/// Drop a room from the map once it has left (launched, redirected or unmounted)
fn spawn_reaper(state: &AppState, session_id: &str, room: &Arc<WaitingRoom>) {
    let rooms = Arc::clone(&state.rooms);
    let session_id = session_id.to_string();
    let weak = Arc::downgrade(room);
    let mut mounted_rx = room.subscribe_mounted();

    tokio::spawn(async move {
        let _ = mounted_rx.wait_for(|mounted| !*mounted).await;

        let mut rooms = rooms.write().await;
        let same_room = match (rooms.get(&session_id), weak.upgrade()) {
            (Some(current), Some(room)) => Arc::ptr_eq(current, &room),
            _ => false,
        };
        if same_room {
            rooms.remove(&session_id);
            info!("Waiting room {} left, removed", session_id);
        }
    });
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /rooms/:session_id
/// Mount a waiting room for a session
pub async fn mount_room(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let mut rooms = state.rooms.write().await;

    if rooms.get(&session_id).is_some_and(|room| room.is_mounted()) {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("Waiting room {} is already mounted", session_id),
            }),
        )
            .into_response();
    }

    let navigator: Arc<dyn Navigator> = state.navigator.clone();
    let room = Arc::new(WaitingRoom::mount(
        session_id.clone(),
        Arc::clone(&state.store),
        Arc::clone(&state.provider),
        navigator,
        state.settings.clone(),
    ));

    let view = room.view();
    spawn_reaper(&state, &session_id, &room);
    rooms.insert(session_id.clone(), room);

    info!("Waiting room mounted: {}", session_id);

    (StatusCode::CREATED, Json(view)).into_response()
}

/// GET /rooms/:session_id
/// Current render model of a waiting room
pub async fn get_room(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let rooms = state.rooms.read().await;

    match rooms.get(&session_id) {
        Some(room) => (StatusCode::OK, Json(room.view())).into_response(),
        None => not_found(&session_id),
    }
}

/// POST /rooms/:session_id/start
/// Begin the launch countdown
pub async fn start_room(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let rooms = state.rooms.read().await;

    let Some(room) = rooms.get(&session_id) else {
        return not_found(&session_id);
    };

    if room.start() {
        (StatusCode::OK, Json(room.view())).into_response()
    } else {
        warn!("Start rejected for waiting room {}", session_id);
        (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Start is not available: microphone access and session details are required"
                    .to_string(),
            }),
        )
            .into_response()
    }
}

/// POST /rooms/:session_id/back
/// Leave the waiting room for the setup page
pub async fn back_room(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let room = state.rooms.write().await.remove(&session_id);

    match room {
        Some(room) => {
            room.back();
            (
                StatusCode::OK,
                Json(LeaveResponse {
                    session_id,
                    status: "redirected".to_string(),
                    location: Some(state.settings.setup_path.clone()),
                }),
            )
                .into_response()
        }
        None => not_found(&session_id),
    }
}

/// DELETE /rooms/:session_id
/// Unmount a waiting room and release its devices
pub async fn unmount_room(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let room = state.rooms.write().await.remove(&session_id);

    match room {
        Some(room) => {
            room.unmount();
            (
                StatusCode::OK,
                Json(LeaveResponse {
                    session_id,
                    status: "unmounted".to_string(),
                    location: None,
                }),
            )
                .into_response()
        }
        None => not_found(&session_id),
    }
}

/// GET /navigation
/// Navigation requested by all rooms, oldest first
pub async fn navigation_history(State(state): State<AppState>) -> impl IntoResponse {
    let history: Vec<NavigationEntry> = state.navigator.history();
    (StatusCode::OK, Json(history))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
