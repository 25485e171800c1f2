//! Session read routes: listing, single fetch, QR payload, and the paged
//! attendance record listing used by late subscribers to resync.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use util::state::AppState;

use super::common::{QrPayload, RecordsQuery, RecordsResponse, SessionResponse};
use crate::response::ApiResponse;
use db::models::attendance_record::{Column as RecordCol, Entity as RecordEntity, Model as Record};
use db::models::session::{Column as SessionCol, Entity as SessionEntity, Model as Session};

/// GET `/api/sessions`
pub async fn list_sessions(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<SessionResponse>>>) {
    match SessionEntity::find()
        .order_by_desc(SessionCol::StartedAt)
        .all(state.db())
        .await
    {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(SessionResponse::from).collect(),
                "Sessions retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!("list_sessions failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving sessions")),
            )
        }
    }
}

/// GET `/api/sessions/{session_id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<SessionResponse>>>) {
    let db = state.db();
    match Session::find_by_id(db, session_id).await {
        Ok(Some(s)) => {
            let present = Record::present_count(db, session_id).await.unwrap_or(0);
            (
                StatusCode::OK,
                Json(ApiResponse::success(
                    Some(SessionResponse::with_present_count(s, present)),
                    "Session retrieved",
                )),
            )
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Session not found")),
        ),
        Err(e) => {
            tracing::error!("get_session failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving session")),
            )
        }
    }
}

/// GET `/api/sessions/teacher/{teacher_id}`
pub async fn list_teacher_sessions(
    State(state): State<AppState>,
    Path(teacher_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Vec<SessionResponse>>>) {
    match Session::find_by_teacher(state.db(), teacher_id).await {
        Ok(rows) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                rows.into_iter().map(SessionResponse::from).collect(),
                "Sessions retrieved",
            )),
        ),
        Err(e) => {
            tracing::error!("list_teacher_sessions failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving sessions")),
            )
        }
    }
}

/// GET `/api/sessions/{session_id}/qr`
///
/// The payload the teacher client renders as a QR code. The scanner app
/// decodes it and submits a mark over the session's WebSocket topic.
pub async fn get_qr_payload(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
) -> (StatusCode, Json<ApiResponse<Option<QrPayload>>>) {
    match Session::find_by_id(state.db(), session_id).await {
        Ok(Some(s)) => {
            let payload = QrPayload {
                geo_locations: [s.anchor_lon, s.anchor_lat],
                session_id: s.id,
                course_id: s.course_id,
                room_number: s.room_number.clone(),
                teacher: s.teacher_id,
            };
            (
                StatusCode::OK,
                Json(ApiResponse::success(Some(payload), "QR payload retrieved")),
            )
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Session not found")),
        ),
        Err(e) => {
            tracing::error!("get_qr_payload failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving session")),
            )
        }
    }
}

/// GET `/api/sessions/{session_id}/attendance`
///
/// Paged listing of the session's attendance records.
///
/// **Query**:
/// - `sort`: `marked_at` | `student_id` (prefix `-` for desc)
/// - `page` (default 1), `per_page` (default 20, max 100)
pub async fn list_session_records(
    State(state): State<AppState>,
    Path(session_id): Path<i64>,
    Query(q): Query<RecordsQuery>,
) -> (StatusCode, Json<ApiResponse<Option<RecordsResponse>>>) {
    let db = state.db();

    match Session::find_by_id(db, session_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("Session not found")),
            );
        }
        Err(e) => {
            tracing::error!("list_session_records failed: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Database error retrieving records")),
            );
        }
    }

    let page = q.page.unwrap_or(1).max(1) as u64;
    let per_page = q.per_page.unwrap_or(20).clamp(1, 100) as u64;

    let mut sel = RecordEntity::find().filter(RecordCol::SessionId.eq(session_id));
    sel = match q.sort.as_deref() {
        Some("-marked_at") => sel.order_by_desc(RecordCol::MarkedAt),
        Some("marked_at") => sel.order_by_asc(RecordCol::MarkedAt),
        Some("-student_id") => sel.order_by_desc(RecordCol::StudentId),
        _ => sel.order_by_asc(RecordCol::StudentId),
    };

    let paginator = sel.paginate(db, per_page);
    let total = paginator.num_items().await.unwrap_or(0) as i32;
    let rows = paginator
        .fetch_page(page.saturating_sub(1))
        .await
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            Some(RecordsResponse {
                records: rows,
                page: page as i32,
                per_page: per_page as i32,
                total,
            }),
            "Attendance records retrieved",
        )),
    )
}
