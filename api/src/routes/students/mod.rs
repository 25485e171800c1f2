use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod get;
mod post;

pub use get::{get_student, list_students};
pub use post::create_student;

pub fn students_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(list_students))
        .route("/{student_id}", get(get_student))
}
