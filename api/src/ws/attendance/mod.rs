use axum::{Router, routing::get};
use util::state::AppState;

pub mod common;
pub mod emit;
pub mod handlers;
pub mod payload;
pub mod topics;
pub mod ws_handlers;

use handlers::session_ws_handler;

pub fn ws_attendance_routes() -> Router<AppState> {
    Router::new().route("/{session_id}", get(session_ws_handler))
}
