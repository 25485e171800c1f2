use crate::helpers::app::{empty_request, json_request, make_test_app, read_json};
use crate::helpers::seed::{ANCHOR, seed_session};
use axum::http::StatusCode;
use db::models::attendance_record::Model as Record;
use serde_json::json;
use tokio::time::{Duration, timeout};
use tower::ServiceExt;

#[tokio::test]
async fn create_session_resolves_course_and_teacher() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 0).await;

    let body = json!({
        "course_code": "CSE101",
        "teacher_user_id": seeded.teacher_user.id,
        "room_number": "LT-5",
        "latitude": ANCHOR.lat,
        "longitude": ANCHOR.lon,
        "accuracy_m": 8.0,
    });
    let resp = app
        .oneshot(json_request("POST", "/api/sessions", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body = read_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["course_id"], seeded.course.id);
    assert_eq!(body["data"]["teacher_id"], seeded.teacher.id);
    assert_eq!(body["data"]["room_number"], "LT-5");
    assert!(body["data"]["finished_at"].is_null());
}

#[tokio::test]
async fn create_session_with_unknown_course_is_not_found() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 0).await;

    let body = json!({
        "course_code": "NOPE999",
        "teacher_user_id": seeded.teacher_user.id,
        "room_number": "LT-5",
        "latitude": ANCHOR.lat,
        "longitude": ANCHOR.lon,
    });
    let resp = app
        .oneshot(json_request("POST", "/api/sessions", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_session_rejects_out_of_range_latitude() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 0).await;

    let body = json!({
        "course_code": "CSE101",
        "teacher_user_id": seeded.teacher_user.id,
        "room_number": "LT-5",
        "latitude": 123.0,
        "longitude": ANCHOR.lon,
    });
    let resp = app
        .oneshot(json_request("POST", "/api/sessions", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn qr_payload_matches_the_scanner_contract() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 0).await;

    let uri = format!("/api/sessions/{}/qr", seeded.session.id);
    let resp = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    let data = &body["data"];
    // Scanner expects [lon, lat].
    assert_eq!(data["geoLocations"][0], ANCHOR.lon);
    assert_eq!(data["geoLocations"][1], ANCHOR.lat);
    assert_eq!(data["sessionId"], seeded.session.id);
    assert_eq!(data["courseId"], seeded.course.id);
    assert_eq!(data["roomNumber"], "LT-2");
    assert_eq!(data["teacher"], seeded.teacher.id);
}

#[tokio::test]
async fn get_unknown_session_is_not_found() {
    let (app, _state) = make_test_app().await;
    let resp = app
        .oneshot(empty_request("GET", "/api/sessions/999"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn finish_backfills_absents_and_notifies_the_topic() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 3).await;

    // One student marked present before the bell.
    Record::set_present(state.db(), seeded.session.id, seeded.students[0].id, true)
        .await
        .unwrap();

    let topic = format!("attendance:session:{}", seeded.session.id);
    let mut rx = state.ws().subscribe(&topic).await;

    let uri = format!("/api/sessions/{}/finish", seeded.session.id);
    let resp = app
        .clone()
        .oneshot(empty_request("POST", &uri))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["data"]["enrolled"], 3);
    assert_eq!(body["data"]["already_marked"], 1);
    assert_eq!(body["data"]["marked_absent"], 2);

    let frame = timeout(Duration::from_millis(200), rx.recv())
        .await
        .unwrap()
        .unwrap();
    let event: serde_json::Value = serde_json::from_str(&frame).unwrap();
    assert_eq!(event["event"], "attendance.session_finished");
    assert_eq!(event["payload"]["marked_absent"], 2);

    // Finishing twice is refused.
    let resp = app.oneshot(empty_request("POST", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn session_records_are_paged() {
    let (app, state) = make_test_app().await;
    let seeded = seed_session(state.db(), 3).await;
    for s in &seeded.students {
        Record::set_present(state.db(), seeded.session.id, s.id, true)
            .await
            .unwrap();
    }

    let uri = format!(
        "/api/sessions/{}/attendance?page=1&per_page=2",
        seeded.session.id
    );
    let resp = app.oneshot(empty_request("GET", &uri)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = read_json(resp).await;
    assert_eq!(body["data"]["total"], 3);
    assert_eq!(body["data"]["per_page"], 2);
    assert_eq!(body["data"]["records"].as_array().unwrap().len(), 2);
}
