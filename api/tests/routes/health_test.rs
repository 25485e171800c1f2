use crate::helpers::app::{empty_request, make_test_app, read_json};
use axum::http::StatusCode;
use tower::ServiceExt;

#[tokio::test]
async fn health_reports_ok() {
    let (app, _state) = make_test_app().await;

    let resp = app
        .oneshot(empty_request("GET", "/api/health"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
}
