use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, Query, State, WebSocketUpgrade},
    response::IntoResponse,
};
use serde::Deserialize;
use util::state::AppState;
use util::ws::axum_adapter::ws_route;
use util::ws::serve::WsServerOptions;

use super::topics::session_topic;
use super::ws_handlers::AttendanceWsHandler;

#[derive(Deserialize)]
pub struct WsQuery {
    /// Optional identity for presence tracking; anonymous viewers omit it.
    pub student_id: Option<i64>,
}

/// GET `/ws/sessions/{session_id}`
pub async fn session_ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
    Path(session_id): Path<i64>,
    Query(q): Query<WsQuery>,
) -> impl IntoResponse {
    let handler = Arc::new(AttendanceWsHandler::new(app_state.db_clone()));
    let topic = move || session_topic(session_id);
    let opts = WsServerOptions::default();

    ws_route(
        ws,
        State(app_state),
        Extension(q.student_id),
        topic,
        handler,
        opts,
    )
    .await
}
