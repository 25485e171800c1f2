use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod common;
mod get;
mod post;

pub use get::{get_qr_payload, get_session, list_session_records, list_sessions, list_teacher_sessions};
pub use post::{create_session, finish_session};

pub fn sessions_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session).get(list_sessions))
        .route("/{session_id}", get(get_session))
        .route("/teacher/{teacher_id}", get(list_teacher_sessions))
        .route("/{session_id}/qr", get(get_qr_payload))
        .route("/{session_id}/finish", post(finish_session))
        .route("/{session_id}/attendance", get(list_session_records))
}
