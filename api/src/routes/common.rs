use axum::http::StatusCode;
use db::models::attendance_record::AttendanceError;

/// Maps attendance-domain errors onto HTTP status codes.
pub fn attendance_error_status(err: &AttendanceError) -> StatusCode {
    match err {
        AttendanceError::SessionNotFound(_)
        | AttendanceError::StudentNotFound(_)
        | AttendanceError::CourseNotFound(_)
        | AttendanceError::RecordNotFound { .. } => StatusCode::NOT_FOUND,
        AttendanceError::SessionFinished(_) | AttendanceError::DuplicateFingerprint => {
            StatusCode::CONFLICT
        }
        AttendanceError::LocationUnavailable | AttendanceError::ProximityRejected { .. } => {
            StatusCode::BAD_REQUEST
        }
        AttendanceError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
