use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::{teacher::Model as Teacher, user::Model as User};

#[derive(Deserialize)]
pub struct CreateTeacherReq {
    pub user_id: i64,
}

/// POST `/api/teachers`
pub async fn create_teacher(
    State(state): State<AppState>,
    Json(body): Json<CreateTeacherReq>,
) -> (StatusCode, Json<ApiResponse<Option<Teacher>>>) {
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
            tracing::error!("create_teacher lookup failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error creating teacher")),
            );
        }
    }

    match Teacher::create(db, body.user_id).await {
        Ok(t) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(t), "Teacher created")),
        ),
        Err(e) if e.to_string().contains("UNIQUE") => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error("Teacher profile already exists")),
        ),
        Err(e) => {
            tracing::error!("create_teacher failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to create teacher")),
            )
        }
    }
}
