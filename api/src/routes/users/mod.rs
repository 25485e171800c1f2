use axum::{
    Router,
    routing::{get, post},
};
use util::state::AppState;

mod get;
mod post;

pub use get::get_user;
pub use post::create_user;

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/{user_id}", get(get_user))
}
