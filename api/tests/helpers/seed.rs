use db::models::{course, course_student, session, student, teacher, user};
use sea_orm::DatabaseConnection;
use util::geo::Coordinates;

pub const ANCHOR: Coordinates = Coordinates {
    lat: -25.7545,
    lon: 28.2314,
};

pub struct Seeded {
    pub course: course::Model,
    pub teacher: teacher::Model,
    pub teacher_user: user::Model,
    pub session: session::Model,
    pub students: Vec<student::Model>,
}

/// Seeds a course, a teacher, an open session anchored at `ANCHOR`, and
/// `student_count` enrolled students.
pub async fn seed_session(db: &DatabaseConnection, student_count: usize) -> Seeded {
    let teacher_user = user::Model::create(db, "t-100", "pw", user::Role::Teacher, "Thabo", "N")
        .await
        .unwrap();
    let teacher = teacher::Model::create(db, teacher_user.id).await.unwrap();
    let course = course::Model::create(db, "CSE101", "Intro to CS", "Computer Science")
        .await
        .unwrap();

    let mut students = Vec::new();
    for i in 0..student_count {
        let u = user::Model::create(
            db,
            &format!("s-{i:03}"),
            "pw",
            user::Role::Student,
            "Student",
            &format!("{i}"),
        )
        .await
        .unwrap();
        let s = student::Model::create(db, u.id).await.unwrap();
        course_student::Model::enroll(db, course.id, s.id)
            .await
            .unwrap();
        students.push(s);
    }

    let session = session::Model::create(db, course.id, teacher.id, "LT-2", ANCHOR, Some(5.0))
        .await
        .unwrap();

    Seeded {
        course,
        teacher,
        teacher_user,
        session,
        students,
    }
}
