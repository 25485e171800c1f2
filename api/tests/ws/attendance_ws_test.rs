//! Drives the session topic handler directly: messages go through the same
//! parse/dispatch types the socket loop uses, broadcasts are observed by
//! subscribing to the topic, and direct replies are read off the
//! connection's outbound queue.

use crate::helpers::seed::{ANCHOR, seed_session};
use api::ws::attendance::common::AttendanceIncoming;
use api::ws::attendance::ws_handlers::AttendanceWsHandler;
use axum::extract::ws::Message;
use sea_orm::DatabaseConnection;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};
use util::ws::handler_trait::WsHandler;
use util::ws::runtime::WsContext;
use util::ws::WebSocketManager;

struct Harness {
    handler: AttendanceWsHandler,
    ctx: WsContext,
    ws: WebSocketManager,
    out_rx: mpsc::Receiver<Message>,
}

fn harness(db: DatabaseConnection, session_id: i64) -> Harness {
    let ws = WebSocketManager::new();
    let (out_tx, out_rx) = mpsc::channel(16);
    let topic = format!("attendance:session:{session_id}");
    let ctx = WsContext::new(topic, ws.clone(), out_tx);
    Harness {
        handler: AttendanceWsHandler::new(db),
        ctx,
        ws,
        out_rx,
    }
}

fn mark_message(session_id: i64, student_id: i64, fingerprint: &str, lat: f64, lon: f64) -> AttendanceIncoming {
    let raw = json!({
        "event": "mark_attendance",
        "payload": {
            "session_id": session_id,
            "student_id": student_id,
            "fingerprint": fingerprint,
            "location": [lon, lat],
            "accuracy_m": null,
        }
    });
    serde_json::from_value(raw).expect("wire format should parse")
}

fn mark_message_with_presence(
    session_id: i64,
    student_id: i64,
    fingerprint: &str,
    is_present: bool,
) -> AttendanceIncoming {
    let raw = json!({
        "event": "mark_attendance",
        "payload": {
            "session_id": session_id,
            "student_id": student_id,
            "is_present": is_present,
            "fingerprint": fingerprint,
            "location": [ANCHOR.lon, ANCHOR.lat],
            "accuracy_m": null,
        }
    });
    serde_json::from_value(raw).expect("wire format should parse")
}

async fn next_broadcast(rx: &mut tokio::sync::broadcast::Receiver<String>) -> serde_json::Value {
    let frame = timeout(Duration::from_millis(200), rx.recv())
        .await
        .expect("expected a broadcast")
        .unwrap();
    serde_json::from_str(&frame).unwrap()
}

#[tokio::test]
async fn accepted_mark_is_broadcast_to_the_topic() {
    let db = db::test_utils::setup_test_db().await;
    let seeded = seed_session(&db, 2).await;
    let mut h = harness(db, seeded.session.id);

    let mut rx = h.ws.subscribe(&h.ctx.topic).await;

    let msg = mark_message(
        seeded.session.id,
        seeded.students[0].id,
        "device-a",
        ANCHOR.lat,
        ANCHOR.lon,
    );
    h.handler.on_message(&h.ctx, msg).await;

    let event = next_broadcast(&mut rx).await;
    assert_eq!(event["event"], "attendance.marked");
    assert_eq!(event["payload"]["student_id"], seeded.students[0].id);
    assert_eq!(event["payload"]["is_present"], true);
    assert_eq!(event["payload"]["count"], 1);

    // Nothing was sent back on the private queue.
    assert!(h.out_rx.try_recv().is_err());
}

#[tokio::test]
async fn submitted_is_present_flag_is_honored() {
    let db = db::test_utils::setup_test_db().await;
    let seeded = seed_session(&db, 1).await;
    let mut h = harness(db.clone(), seeded.session.id);

    let mut rx = h.ws.subscribe(&h.ctx.topic).await;
    let sid = seeded.students[0].id;

    let msg = mark_message_with_presence(seeded.session.id, sid, "device-a", true);
    h.handler.on_message(&h.ctx, msg).await;
    let event = next_broadcast(&mut rx).await;
    assert_eq!(event["payload"]["is_present"], true);

    let msg = mark_message_with_presence(seeded.session.id, sid, "device-a", false);
    h.handler.on_message(&h.ctx, msg).await;
    let event = next_broadcast(&mut rx).await;
    assert_eq!(event["payload"]["is_present"], false);
    assert_eq!(event["payload"]["count"], 0);

    let rec = db::models::attendance_record::Model::find_one(&db, seeded.session.id, sid)
        .await
        .unwrap()
        .unwrap();
    assert!(!rec.is_present);
}

#[tokio::test]
async fn far_away_mark_is_rejected_privately() {
    let db = db::test_utils::setup_test_db().await;
    let seeded = seed_session(&db, 1).await;
    let mut h = harness(db, seeded.session.id);

    let mut rx = h.ws.subscribe(&h.ctx.topic).await;

    // ~111m north of the anchor.
    let msg = mark_message(
        seeded.session.id,
        seeded.students[0].id,
        "device-a",
        ANCHOR.lat + 0.001,
        ANCHOR.lon,
    );
    h.handler.on_message(&h.ctx, msg).await;

    let reply = timeout(Duration::from_millis(200), h.out_rx.recv())
        .await
        .expect("expected a rejection reply")
        .unwrap();
    let Message::Text(text) = reply else {
        panic!("expected a text frame");
    };
    let event: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
    assert_eq!(event["event"], "attendance.rejected");
    assert_eq!(event["payload"]["reason"], "proximity_rejected");

    // The room never hears about it.
    assert!(
        timeout(Duration::from_millis(50), rx.recv()).await.is_err(),
        "rejection must not be broadcast"
    );
}

#[tokio::test]
async fn zeroed_location_is_rejected_as_unavailable() {
    let db = db::test_utils::setup_test_db().await;
    let seeded = seed_session(&db, 1).await;
    let mut h = harness(db, seeded.session.id);

    let msg = mark_message(seeded.session.id, seeded.students[0].id, "device-a", 0.0, 0.0);
    h.handler.on_message(&h.ctx, msg).await;

    let reply = timeout(Duration::from_millis(200), h.out_rx.recv())
        .await
        .expect("expected a rejection reply")
        .unwrap();
    let Message::Text(text) = reply else {
        panic!("expected a text frame");
    };
    let event: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
    assert_eq!(event["payload"]["reason"], "location_unavailable");
}

#[tokio::test]
async fn shared_device_blocks_the_second_student() {
    let db = db::test_utils::setup_test_db().await;
    let seeded = seed_session(&db, 2).await;
    let mut h = harness(db.clone(), seeded.session.id);

    let first = mark_message(
        seeded.session.id,
        seeded.students[0].id,
        "shared-device",
        ANCHOR.lat,
        ANCHOR.lon,
    );
    h.handler.on_message(&h.ctx, first).await;

    let second = mark_message(
        seeded.session.id,
        seeded.students[1].id,
        "shared-device",
        ANCHOR.lat,
        ANCHOR.lon,
    );
    h.handler.on_message(&h.ctx, second).await;

    let reply = timeout(Duration::from_millis(200), h.out_rx.recv())
        .await
        .expect("expected a rejection reply")
        .unwrap();
    let Message::Text(text) = reply else {
        panic!("expected a text frame");
    };
    let event: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
    assert_eq!(event["event"], "attendance.rejected");
    assert_eq!(event["payload"]["reason"], "duplicate_fingerprint");
    assert_eq!(event["payload"]["student_id"], seeded.students[1].id);

    // First writer keeps the claim.
    let rec = db::models::attendance_record::Model::find_one(
        &db,
        seeded.session.id,
        seeded.students[0].id,
    )
    .await
    .unwrap()
    .unwrap();
    assert!(rec.is_present);
}
