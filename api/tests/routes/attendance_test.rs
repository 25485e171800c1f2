use crate::helpers::app::{empty_request, json_request, make_test_app, read_json};
use crate::helpers::seed::seed_session;
use axum::http::StatusCode;
use db::models::attendance_record::Model as Record;
use serde_json::json;
use tokio::time::{Duration, timeout};
use tower::ServiceExt;

#[tokio::test]
async fn teacher_sets_then_toggles_presence() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 1).await;
    let student_id = seeded.students[0].id;
    let uri = format!("/api/attendance/{}/{}", seeded.session.id, student_id);

    // Explicit set.
    let resp = app
        .clone()
        .oneshot(json_request("PUT", &uri, json!({ "is_present": true })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["is_present"], true);

    // Bodyless PUT flips it.
    let resp = app.oneshot(empty_request("PUT", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = read_json(resp).await;
    assert_eq!(body["data"]["is_present"], false);
}

#[tokio::test]
async fn toggle_without_a_record_is_not_found() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 1).await;
    let uri = format!(
        "/api/attendance/{}/{}",
        seeded.session.id, seeded.students[0].id
    );

    let resp = app.oneshot(empty_request("PUT", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn modify_unknown_session_is_not_found() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 1).await;
    let uri = format!("/api/attendance/999/{}", seeded.students[0].id);

    let resp = app
        .oneshot(json_request("PUT", &uri, json!({ "is_present": true })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn modify_broadcasts_the_updated_headcount() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 1).await;
    let student_id = seeded.students[0].id;

    let topic = format!("attendance:session:{}", seeded.session.id);
    let mut rx = state.ws().subscribe(&topic).await;

    let uri = format!("/api/attendance/{}/{}", seeded.session.id, student_id);
    let resp = app
        .oneshot(json_request("PUT", &uri, json!({ "is_present": true })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let frame = timeout(Duration::from_millis(200), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let event: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(event["event"], "attendance.marked");
    assert_eq!(event["payload"]["student_id"], student_id);
    assert_eq!(event["payload"]["is_present"], true);
    assert_eq!(event["payload"]["count"], 1);
}

#[tokio::test]
async fn student_history_lists_marks_newest_first() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 1).await;
    let student_id = seeded.students[0].id;

    Record::set_present(state.db(), seeded.session.id, student_id, true)
        .await
        .unwrap();

    let uri = format!("/api/attendance/student/{student_id}");
    let resp = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["session_id"], seeded.session.id);
}

#[tokio::test]
async fn history_for_unknown_student_is_not_found() {
    let (app, _state) = make_test_app().await;
    let resp = app
        .oneshot(empty_request("GET", "/api/attendance/student/999"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
