use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::{student::Model as Student, user::Model as User};

#[derive(Deserialize)]
pub struct CreateStudentReq {
    pub user_id: i64,
}

/// POST `/api/students`
///
/// Creates a student profile for an existing account.
pub async fn create_student(
    State(state): State<AppState>,
    Json(body): Json<CreateStudentReq>,
) -> (StatusCode, Json<ApiResponse<Option<Student>>>) {
    let db = state.db();

    match User::find_by_id(db, body.user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("User not found")),
            );
        }
        Err(e) => {
            tracing::error!("create_student lookup failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error creating student")),
            );
        }
    }

    match Student::create(db, body.user_id).await {
        Ok(s) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(s), "Student created")),
        ),
        Err(e) if e.to_string().contains("UNIQUE") => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Student profile already exists")),
        ),
        Err(e) => {
            tracing::error!("create_student failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create student")),
            )
        }
    }
}
