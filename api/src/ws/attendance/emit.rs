use chrono::Utc;
use serde::Serialize;
use util::ws::{EventEnvelope, WebSocketManager};

use super::{payload, topics::session_topic};
use crate::ws::core::{envelope, event::Event};

#[derive(Debug, Serialize)]
pub struct AttendanceMarkedEvent {
    #[serde(flatten)]
    pub payload: payload::AttendanceMarked,
}
impl Event for AttendanceMarkedEvent {
    const NAME: &'static str = "attendance.marked";
    fn topic_path(&self) -> String {
        session_topic(self.payload.session_id)
    }
}

#[derive(Debug, Serialize)]
pub struct SessionFinishedEvent {
    #[serde(flatten)]
    pub payload: payload::SessionFinished,
}
impl Event for SessionFinishedEvent {
    const NAME: &'static str = "attendance.session_finished";
    fn topic_path(&self) -> String {
        session_topic(self.payload.session_id)
    }
}

pub const ATTENDANCE_REJECTED: &str = "attendance.rejected";

/* ---------- one-liner helpers ---------- */

pub async fn attendance_marked(ws: &WebSocketManager, p: payload::AttendanceMarked) {
    envelope::emit(ws, &AttendanceMarkedEvent { payload: p }).await;
}

pub async fn session_finished(ws: &WebSocketManager, p: payload::SessionFinished) {
    envelope::emit(ws, &SessionFinishedEvent { payload: p }).await;
}

/// Rejections are not broadcast: the caller sends this frame back on the
/// submitting connection only.
pub fn rejection_frame(p: &payload::AttendanceRejected) -> String {
    let topic = session_topic(p.session_id);
    let env = EventEnvelope {
        r#type: "event",
        event: ATTENDANCE_REJECTED,
        topic: &topic,
        payload: p,
        ts: Utc::now().to_rfc3339(),
    };
    serde_json::to_string(&env).unwrap_or_default()
}
