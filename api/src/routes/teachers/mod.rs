use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod get;
mod post;

pub use get::get_teacher;
pub use post::create_teacher;

pub fn teachers_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_teacher))
        .route("/{teacher_id}", get(get_teacher))
}
