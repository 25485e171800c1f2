use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::{attendance_record::Model as Record, student::Model as Student};

/// GET `/api/attendance/student/{student_id}`
///
/// A student's attendance history across all sessions, newest first.
pub async fn student_history(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<Record>>>) {
    let db = state.db();

    match Student::find_by_id(db, student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Student not found")),
            );
        }
        Err(e) => {
            tracing::error!("student_history lookup failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving history")),
            );
        }
    }

    match Record::for_student(db, student_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Attendance history retrieved")),
        ),
        Err(e) => {
            tracing::error!("student_history failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving history")),
            )
        }
    }
}
