/// Canonical topic for one session's attendance events.
pub fn session_topic(session_id: i64) -> String {
    format!("attendance:session:{session_id}")
}
