//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness probe
//! - `/users`, `/students`, `/teachers` → account and profile management
//! - `/courses` → course CRUD and enrollment
//! - `/sessions` → class sessions: create, QR payload, finish, records
//! - `/attendance` → teacher corrections and per-student history

use axum::Router;
use util::state::AppState;

use crate::routes::{
    attendance::attendance_routes, courses::courses_routes, health::health_routes,
    sessions::sessions_routes, students::students_routes, teachers::teachers_routes,
    users::users_routes,
};

pub mod attendance;
pub mod common;
pub mod courses;
pub mod health;
pub mod sessions;
pub mod students;
pub mod teachers;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/users", users_routes())
        .nest("/students", students_routes())
        .nest("/teachers", teachers_routes())
        .nest("/courses", courses_routes())
        .nest("/sessions", sessions_routes())
        .nest("/attendance", attendance_routes())
        .with_state(app_state)
}
