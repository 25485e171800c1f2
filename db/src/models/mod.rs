pub mod attendance_record;
pub mod course;
pub mod course_student;
pub mod session;
pub mod student;
pub mod teacher;
pub mod user;
