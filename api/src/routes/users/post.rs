use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use util::state::AppState;

use crate::response::ApiResponse;
use db::models::user::{Model as User, Role};

#[derive(Deserialize)]
pub struct CreateUserReq {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
}

/// POST `/api/users`
///
/// Creates an account. Student and teacher profile rows are created
/// separately via `/api/students` and `/api/teachers`.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserReq>,
) -> (StatusCode, Json<ApiResponse<Option<User>>>) {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error("username and password are required")),
        );
    }

    match User::create(
        state.db(),
        body.username.trim(),
        &body.password,
        body.role,
        &body.first_name,
        &body.last_name,
    )
    .await
    {
        Ok(u) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(Some(u), "User created")),
        ),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("UNIQUE") {
                (
                    StatusCode::CONFLICT,
                    Json(ApiResponse::error("Username already taken")),
                )
            } else {
                tracing::error!("create_user failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error("Failed to create user")),
                )
            }
        }
    }
}
