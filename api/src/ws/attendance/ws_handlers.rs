use sea_orm::DatabaseConnection;
use util::ws::handler_trait::WsHandler;
use util::ws::runtime::WsContext;

use super::common::{AttendanceIncoming, MarkPayload};
use super::{emit, payload};
use db::models::attendance_record::{AttendanceError, MarkRequest, Model as Record};
use util::geo::Coordinates;

/// Per-connection handler for a session topic. Drives the full mark
/// pipeline; accepted marks are broadcast, rejections go back to the
/// submitting client only.
pub struct AttendanceWsHandler {
    db: DatabaseConnection,
}

impl AttendanceWsHandler {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn handle_mark(&self, ctx: &WsContext, mark: MarkPayload) {
        let [lon, lat] = mark.location;
        let req = MarkRequest {
            session_id: mark.session_id,
            student_id: mark.student_id,
            is_present: mark.is_present,
            fingerprint: mark.fingerprint.clone(),
            device: Coordinates::new(lat, lon),
            device_accuracy_m: mark.accuracy_m,
        };

        match Record::mark(&self.db, &req).await {
            Ok(rec) => {
                let count = Record::present_count(&self.db, mark.session_id)
                    .await
                    .unwrap_or(0);
                emit::attendance_marked(
                    &ctx.ws,
                    payload::AttendanceMarked {
                        session_id: rec.session_id,
                        student_id: rec.student_id,
                        is_present: rec.is_present,
                        marked_at: rec.marked_at.to_rfc3339(),
                        count,
                    },
                )
                .await;
            }
            Err(err) => {
                if let AttendanceError::Db(e) = &err {
                    tracing::error!("mark failed on '{}': {e}", ctx.topic);
                }
                let frame = emit::rejection_frame(&payload::AttendanceRejected {
                    session_id: mark.session_id,
                    student_id: mark.student_id,
                    reason: err.code().to_string(),
                    message: err.to_string(),
                });
                let _ = ctx.reply_text(frame).await;
            }
        }
    }
}

impl WsHandler for AttendanceWsHandler {
    type In = AttendanceIncoming;

    async fn on_message(&self, ctx: &WsContext, msg: Self::In) {
        match msg {
            AttendanceIncoming::MarkAttendance(mark) => self.handle_mark(ctx, mark).await,
        }
    }
}
