pub mod m202608250001_create_users;
pub mod m202608250002_create_students;
pub mod m202608250003_create_teachers;
pub mod m202608250004_create_courses;
pub mod m202608250005_create_sessions;
pub mod m202608250006_create_attendance_records;
