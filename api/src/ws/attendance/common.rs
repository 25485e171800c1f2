use serde::Deserialize;

/// Messages a client may send on a session topic.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum AttendanceIncoming {
    MarkAttendance(MarkPayload),
}

/// Self-service mark, sent by the scanner app after decoding the QR code and
/// reading the device's geolocation and fingerprint.
#[derive(Debug, Deserialize)]
pub struct MarkPayload {
    pub session_id: i64,
    pub student_id: i64,
    #[serde(default = "default_present")]
    pub is_present: bool,
    pub fingerprint: String,
    /// `[lon, lat]`, same order as the QR payload's `geoLocations`.
    pub location: [f64; 2],
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

fn default_present() -> bool {
    true
}
