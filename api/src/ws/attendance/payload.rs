use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceMarked {
    pub session_id: i64,
    pub student_id: i64,
    pub is_present: bool,
    pub marked_at: String, // RFC3339
    /// Present headcount for the session after this mark.
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendanceRejected {
    pub session_id: i64,
    pub student_id: i64,
    /// Machine-readable reason, e.g. "duplicate_fingerprint".
    pub reason: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionFinished {
    pub session_id: i64,
    pub enrolled: u64,
    pub marked_absent: u64,
}
