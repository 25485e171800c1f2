use axum::Router;
use util::state::AppState;

use crate::ws::attendance::ws_attendance_routes;

pub mod attendance;
pub mod core;

/// WS route entry point for `/ws/...`.
pub fn ws_routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/sessions", ws_attendance_routes())
        .with_state(app_state)
}
