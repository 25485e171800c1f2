use axum::{
    Router,
    routing::{get, put},
};
use util::state::AppState;

mod get;
mod put;

pub use get::student_history;
pub use put::modify_attendance;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/{session_id}/{student_id}", put(modify_attendance))
        .route("/student/{student_id}", get(student_history))
}
