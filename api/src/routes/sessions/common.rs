use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: i64,
    pub course_id: i64,
    pub teacher_id: i64,
    pub room_number: String,
    pub anchor_lat: f64,
    pub anchor_lon: f64,
    pub anchor_accuracy_m: Option<f64>,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub present_count: u64,
}

impl From<db::models::session::Model> for SessionResponse {
    fn from(m: db::models::session::Model) -> Self {
        Self {
            id: m.id,
            course_id: m.course_id,
            teacher_id: m.teacher_id,
            room_number: m.room_number,
            anchor_lat: m.anchor_lat,
            anchor_lon: m.anchor_lon,
            anchor_accuracy_m: m.anchor_accuracy_m,
            started_at: m.started_at.to_rfc3339(),
            finished_at: m.finished_at.map(|t| t.to_rfc3339()),
            present_count: 0,
        }
    }
}

impl SessionResponse {
    pub fn with_present_count(m: db::models::session::Model, present_count: u64) -> Self {
        let mut base = Self::from(m);
        base.present_count = present_count;
        base
    }
}

/// Session creation request, as sent by the teacher client after it read its
/// own geolocation. The course is addressed by code and the teacher by
/// account id, mirroring what the scheduling UI knows.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionReq {
    #[validate(length(min = 1, message = "course_code is required"))]
    pub course_code: String,
    pub teacher_user_id: i64,
    #[validate(length(min = 1, message = "room_number is required"))]
    pub room_number: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = 0.0))]
    pub accuracy_m: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    pub page: Option<i32>,
    pub per_page: Option<i32>,
    /// "marked_at" | "student_id" (prefix `-` for descending)
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<db::models::attendance_record::Model>,
    pub page: i32,
    pub per_page: i32,
    pub total: i32,
}

/// Payload encoded into the QR code shown by the teacher client. Field names
/// match what the student scanner app expects.
#[derive(Debug, Serialize)]
pub struct QrPayload {
    #[serde(rename = "geoLocations")]
    pub geo_locations: [f64; 2], // [lon, lat]
    #[serde(rename = "sessionId")]
    pub session_id: i64,
    #[serde(rename = "courseId")]
    pub course_id: i64,
    #[serde(rename = "roomNumber")]
    pub room_number: String,
    pub teacher: i64,
}
