use api::{routes::routes, ws::ws_routes};
use axum::{Router, body::Body, http::Request, response::Response};
use std::convert::Infallible;
use tower::ServiceExt;
use tower::util::BoxCloneService;
use util::{state::AppState, ws::WebSocketManager};

/// Builds the full app over a fresh in-memory database. The returned state
/// shares the same connection and manager, so tests can seed rows and
/// subscribe to topics directly.
pub async fn make_test_app() -> (BoxCloneService<Request<Body>, Response, Infallible>, AppState) {
    let db = db::test_utils::setup_test_db().await;
    let state = AppState::new(db, WebSocketManager::new());

    let router: Router = Router::new()
        .nest("/api", routes(state.clone()))
        .nest("/ws", ws_routes(state.clone()));

    (router.into_service().boxed_clone(), state)
}

pub async fn read_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not JSON")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
