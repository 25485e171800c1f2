use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod get;
mod post;

pub use get::{get_course, list_courses};
pub use post::{create_course, enroll_student};

pub fn courses_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).get(list_courses))
        .route("/{course_id}", get(get_course))
        .route("/{course_id}/students/{student_id}", post(enroll_student))
}
