use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::{
    course::Model as Course, course_student::Model as Enrollment, student::Model as Student,
};

#[derive(Deserialize)]
pub struct CreateCourseReq {
    pub course_code: String,
    pub name: String,
    pub department: String,
}

/// POST `/api/courses`
pub async fn create_course(
    State(state): State<AppState>,
    Json(body): Json<CreateCourseReq>,
) -> (StatusCode, Json<ApiResponse<Option<Course>>>) {
    if body.course_code.trim().is_empty() || body.name.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error("course_code and name are required")),
        );
    }

    match Course::create(
        state.db(),
        body.course_code.trim(),
        body.name.trim(),
        body.department.trim(),
    )
    .await
    {
        Ok(c) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(c), "Course created")),
        ),
        Err(e) if e.to_string().contains("UNIQUE") => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Course code already exists")),
        ),
        Err(e) => {
            tracing::error!("create_course failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create course")),
            )
        }
    }
}

/// POST `/api/courses/{course_id}/students/{student_id}`
///
/// Enrolls a student in a course. Enrolling twice is a no-op.
pub async fn enroll_student(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(i64, i64)>,
) -> (StatusCode, Json<ApiResponse<()>>) {
    let db = state.db();

    let course = match Course::find_by_id(db, course_id).await {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("enroll_student course lookup failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error enrolling student")),
            );
        }
    };
    if course.is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Course not found")),
        );
    }

    let student = match Student::find_by_id(db, student_id).await {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("enroll_student student lookup failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error enrolling student")),
            );
        }
    };
    if student.is_none() {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        );
    }

    let already = Enrollment::is_enrolled(db, course_id, student_id)
        .await
        .unwrap_or(false);

    match Enrollment::enroll(db, course_id, student_id).await {
        Ok(()) if already => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Student already enrolled")),
        ),
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success((), "Student enrolled")),
        ),
        Err(e) => {
            tracing::error!("enroll_student failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to enroll student")),
            )
        }
    }
}
