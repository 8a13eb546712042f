//! HTTP surface for the waiting room
//!
//! Exposes the rendered affordances as JSON for a UI shell:
//! - POST /rooms/:session_id - Mount a waiting room
//! - GET /rooms/:session_id - Current view (device rows, start gate, countdown, rounds)
//! - POST /rooms/:session_id/start - Begin the launch countdown
//! - POST /rooms/:session_id/back - Return to setup
//! - DELETE /rooms/:session_id - Unmount and release devices
//! - GET /navigation - Navigation history
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
