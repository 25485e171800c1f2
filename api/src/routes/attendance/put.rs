use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use crate::routes::common::attendance_error_status;
use crate::ws::attendance::{emit, payload};
use db::models::attendance_record::Model as Record;

#[derive(Deserialize, Default)]
pub struct ModifyAttendanceReq {
    /// Desired presence. Omitted means "toggle the current value".
    pub is_present: Option<bool>,
}

/// PUT `/api/attendance/{session_id}/{student_id}`
///
/// Teacher correction path. Skips the proximity and fingerprint checks and
/// works on finished sessions too. With `is_present` it upserts that value;
/// without a body it flips the existing record.
pub async fn modify_attendance(
    State(state): State<AppState>,
    Path((session_id, student_id)): Path<(i64, i64)>,
    body: Option<Json<ModifyAttendanceReq>>,
) -> (StatusCode, Json<ApiResponse<Option<Record>>>) {
    let db = state.db();

    let result = match body.and_then(|Json(b)| b.is_present) {
        Some(value) => Record::set_present(db, session_id, student_id, value).await,
        None => Record::toggle(db, session_id, student_id).await,
    };

    match result {
        Ok(rec) => {
            let count = Record::present_count(db, session_id).await.unwrap_or(0);
            emit::attendance_marked(
                state.ws(),
                payload::AttendanceMarked {
                    session_id,
                    student_id,
                    is_present: rec.is_present,
                    marked_at: rec.marked_at.to_rfc3339(),
                    count,
                },
            )
            .await;
            (
                StatusCode::OK,
                Json(ApiResponse::success(Some(rec), "Attendance updated")),
            )
        }
        Err(e) => (
            attendance_error_status(&e),
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}
