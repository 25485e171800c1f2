use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::geo::Coordinates;
use util::state::AppState;
use validator::Validate;

use super::common::{CreateSessionReq, SessionResponse};
use crate::response::ApiResponse;
use crate::routes::common::attendance_error_status;
use crate::ws::attendance::{emit, payload};
use db::models::{
    course::Model as Course,
    session::{FinishSummary, Model as Session},
    teacher::Model as Teacher,
};

/// POST `/api/sessions`
///
/// Starts a class session. The request carries the teacher device's
/// geolocation, which becomes the proximity anchor every student mark is
/// checked against.
pub async fn create_session(
    State(state): State<AppState>,
    Json(body): Json<CreateSessionReq>,
) -> (StatusCode, Json<ApiResponse<Option<SessionResponse>>>) {
    if let Err(e) = body.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!("Invalid session request: {e}"))),
        );
    }

    let db = state.db();

    let course = match Course::find_by_code(db, body.course_code.trim()).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Course not found")),
            );
        }
        Err(e) => {
            tracing::error!("create_session course lookup failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error creating session")),
            );
        }
    };

    let teacher = match Teacher::find_by_user_id(db, body.teacher_user_id).await {
        Ok(Some(t)) => t,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Teacher not found")),
            );
        }
        Err(e) => {
            tracing::error!("create_session teacher lookup failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error creating session")),
            );
        }
    };

    let anchor = Coordinates::new(body.latitude, body.longitude);
    match Session::create(
        db,
        course.id,
        teacher.id,
        body.room_number.trim(),
        anchor,
        body.accuracy_m,
    )
    .await
    {
        Ok(s) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(SessionResponse::from(s)),
                "Session created",
            )),
        ),
        Err(e) => {
            tracing::error!("create_session failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create session")),
            )
        }
    }
}

/// POST `/api/sessions/{session_id}/finish`
///
/// Closes the session: every enrolled student without a record is written
/// down as absent, further student marks are refused, and subscribers on the
/// session topic are told the session is over.
pub async fn finish_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<FinishSummary>>>) {
    match Session::finish(state.db(), session_id).await {
        Ok(summary) => {
            emit::session_finished(
                state.ws(),
                payload::SessionFinished {
                    session_id,
                    enrolled: summary.enrolled,
                    marked_absent: summary.marked_absent,
                },
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(Some(summary), "Session finished")),
            )
        }
        Err(e) => (
            attendance_error_status(&e),
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}
