use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::EntityTrait;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::course::{Entity as CourseEntity, Model as Course};

/// GET `/api/courses/{course_id}`
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<Course>>>) {
    match Course::find_by_id(state.db(), course_id).await {
        Ok(Some(c)) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(c), "Course retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Course not found")),
        ),
        Err(e) => {
            tracing::error!("get_course failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving course")),
            )
        }
    }
}

/// GET `/api/courses`
pub async fn list_courses(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<Course>>>) {
    match CourseEntity::find().all(state.db()).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(rows, "Courses retrieved")),
        ),
        Err(e) => {
            tracing::error!("list_courses failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving courses")),
            )
        }
    }
}
