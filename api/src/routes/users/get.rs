use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::user::Model as User;

/// GET `/api/users/{user_id}`
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<User>>>) {
    match User::find_by_id(state.db(), user_id).await {
        Ok(Some(u)) => (
            StatusCode::OK,
            Json(ApiResponse::success(Some(u), "User retrieved")),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("User not found")),
        ),
        Err(e) => {
            tracing::error!("get_user failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving user")),
            )
        }
    }
}
