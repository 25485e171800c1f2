use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::student::{Entity as StudentEntity, Model as Student};

/// GET `/api/students/{student_id}`
pub async fn get_student(
    State(state): State<AppState>,
    Path(student_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<Student>>>) {
    match Student::find_by_id(state.db(), student_id).await {
        Ok(Some(s)) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(s), "Student retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Student not found")),
        ),
        Err(e) => {
            tracing::error!("get_student failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving student")),
            )
        }
    }
}

/// GET `/api/students`
pub async fn list_students(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<Student>>>) {
    match StudentEntity::find().all(state.db()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Students retrieved")),
        ),
        Err(e) => {
            tracing::error!("list_students failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving students")),
            )
        }
    }
}
