use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::teacher::Model as Teacher;

/// GET `/api/teachers/{teacher_id}`
pub async fn get_teacher(
    State(state): State<AppState>,
    Path(teacher_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<Teacher>>>) {
    match Teacher::find_by_id(state.db(), teacher_id).await {
        Ok(Some(t)) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(t), "Teacher retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Teacher not found")),
        ),
        Err(e) => {
            tracing::error!("get_teacher failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving teacher")),
            )
        }
    }
}
